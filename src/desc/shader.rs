use smallvec::SmallVec;

use super::types::{ImageType, MAX_STAGE_IMAGES, MAX_UNIFORM_BLOCKS, MAX_UNIFORM_MEMBERS, ShaderStage, UniformType};
use crate::errors::{GfxError, Result};

/// One member of a uniform block, used by backends that set uniforms individually.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformDesc<'a> {
    pub name: &'a str,
    pub uniform_type: UniformType,
    /// `0` resolves to `1`
    pub array_count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct UniformBlockDesc<'a> {
    /// Size in bytes, the exact length `apply_uniforms` must receive
    pub size: usize,
    pub uniforms: SmallVec<[UniformDesc<'a>; 4]>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShaderImageDesc<'a> {
    pub name: &'a str,
    pub image_type: ImageType,
}

/// Source or byte code and the resource interface of one shader stage.
#[derive(Debug, Clone, Default)]
pub struct ShaderStageDesc<'a> {
    pub source: Option<&'a str>,
    pub byte_code: Option<&'a [u8]>,
    /// `""` resolves to `"main"`
    pub entry: &'a str,
    pub uniform_blocks: SmallVec<[UniformBlockDesc<'a>; MAX_UNIFORM_BLOCKS]>,
    pub images: SmallVec<[ShaderImageDesc<'a>; 4]>,
}

/// Name or semantic of a vertex shader input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShaderAttrDesc<'a> {
    pub name: &'a str,
    pub sem_name: &'a str,
    pub sem_index: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ShaderDesc<'a> {
    pub attrs: SmallVec<[ShaderAttrDesc<'a>; 8]>,
    pub vs: ShaderStageDesc<'a>,
    pub fs: ShaderStageDesc<'a>,
    pub label: Option<&'a str>,
}

impl<'a> ShaderDesc<'a> {
    #[must_use]
    pub fn stage(&self, stage: ShaderStage) -> &ShaderStageDesc<'a> {
        match stage {
            ShaderStage::Vertex => &self.vs,
            ShaderStage::Fragment => &self.fs,
        }
    }

    /// Resolves unset fields and checks the stage interfaces.
    pub fn with_defaults(&self) -> Result<Self> {
        let mut desc = self.clone();
        for (name, stage) in [("vertex", &mut desc.vs), ("fragment", &mut desc.fs)] {
            if stage.entry.is_empty() {
                stage.entry = "main";
            }
            for block in &mut stage.uniform_blocks {
                for uniform in &mut block.uniforms {
                    if uniform.array_count == 0 {
                        uniform.array_count = 1;
                    }
                }
            }
            check_stage(name, stage)?;
        }
        Ok(desc)
    }
}

fn check_stage(name: &str, stage: &ShaderStageDesc<'_>) -> Result<()> {
    if stage.source.is_none() && stage.byte_code.is_none() {
        return Err(GfxError::InvalidDescriptor(format!(
            "{name} shader stage needs source or byte code"
        )));
    }
    if stage.uniform_blocks.len() > MAX_UNIFORM_BLOCKS {
        return Err(GfxError::InvalidDescriptor(format!(
            "{name} shader stage declares {} uniform blocks (max {MAX_UNIFORM_BLOCKS})",
            stage.uniform_blocks.len()
        )));
    }
    if stage.images.len() > MAX_STAGE_IMAGES {
        return Err(GfxError::InvalidDescriptor(format!(
            "{name} shader stage declares {} images (max {MAX_STAGE_IMAGES})",
            stage.images.len()
        )));
    }
    for block in &stage.uniform_blocks {
        if block.size == 0 {
            return Err(GfxError::InvalidDescriptor(format!("{name} uniform block size must be non-zero")));
        }
        if block.uniforms.len() > MAX_UNIFORM_MEMBERS {
            return Err(GfxError::InvalidDescriptor(format!(
                "{name} uniform block has {} members (max {MAX_UNIFORM_MEMBERS})",
                block.uniforms.len()
            )));
        }
    }
    Ok(())
}

/// The part of a shader description kept after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderInterface {
    /// Uniform block sizes, indexed by `ShaderStage::index()` then block slot
    pub uniform_block_sizes: [SmallVec<[usize; MAX_UNIFORM_BLOCKS]>; 2],
    /// Number of images each stage samples
    pub num_images: [usize; 2],
}

impl From<&ShaderDesc<'_>> for ShaderInterface {
    fn from(desc: &ShaderDesc<'_>) -> Self {
        let mut interface = Self::default();
        for stage in ShaderStage::ALL {
            let s = desc.stage(stage);
            interface.uniform_block_sizes[stage.index()] = s.uniform_blocks.iter().map(|b| b.size).collect();
            interface.num_images[stage.index()] = s.images.len();
        }
        interface
    }
}
