//! Shader stages and the semantic components flowing in and out of them.

use bitflags::bitflags;

/// Shader stage a [`CodeGenerator`](crate::generator::CodeGenerator) builds code for.
///
/// The stage is not interpreted while building the DAG; it is forwarded as-is to the resulting
/// [`ShaderCode`](crate::shader_code::ShaderCode).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BindingStage {
  VertexShader = 1,
  GeometryShader,
  PixelShader,
}

bitflags! {
  /// Semantic components a stage reads as inputs or writes as outputs.
  ///
  /// Each component is a single flag, so a set of components (such as everything a stage reads) fits in one value.
  /// Operations expecting _a_ component reject sets with [`Error::InvalidComponent`](crate::error::Error).
  #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
  pub struct PinComponent: u64 {
    const POSITION = 1 << 0;
    const NORMAL = 1 << 1;
    const COLOUR = 1 << 2;
    const SECONDARY_COLOUR = 1 << 3;
    const BLEND_WEIGHTS = 1 << 4;
    const BLEND_INDICES = 1 << 5;
    const BI_NORMAL = 1 << 6;
    const TANGENT = 1 << 7;

    const TEX_COORD0 = 1 << 8;
    const TEX_COORD1 = 1 << 9;
    const TEX_COORD2 = 1 << 10;
    const TEX_COORD3 = 1 << 11;
    const TEX_COORD4 = 1 << 12;
    const TEX_COORD5 = 1 << 13;
    const TEX_COORD6 = 1 << 14;
    const TEX_COORD7 = 1 << 15;
    const TEX_COORD8 = 1 << 16;
    const TEX_COORD9 = 1 << 17;
    const TEX_COORD10 = 1 << 18;
    const TEX_COORD11 = 1 << 19;
    const TEX_COORD12 = 1 << 20;
    const TEX_COORD13 = 1 << 21;
    const TEX_COORD14 = 1 << 22;
    const TEX_COORD15 = 1 << 23;

    const USER0 = 1 << 24;
    const USER1 = 1 << 25;
    const USER2 = 1 << 26;
    const USER3 = 1 << 27;
    const USER4 = 1 << 28;
    const USER5 = 1 << 29;
    const USER6 = 1 << 30;
    const USER7 = 1 << 31;
    const USER8 = 1 << 32;
    const USER9 = 1 << 33;
    const USER10 = 1 << 34;
    const USER11 = 1 << 35;
    const USER12 = 1 << 36;
    const USER13 = 1 << 37;
    const USER14 = 1 << 38;
    const USER15 = 1 << 39;

    const DEPTH = 1 << 40;

    const RENDER_TARGET0 = 1 << 41;
    const RENDER_TARGET1 = 1 << 42;
    const RENDER_TARGET2 = 1 << 43;
    const RENDER_TARGET3 = 1 << 44;
    const RENDER_TARGET4 = 1 << 45;
    const RENDER_TARGET5 = 1 << 46;
    const RENDER_TARGET6 = 1 << 47;
    const RENDER_TARGET7 = 1 << 48;

    const VERTEX_ID = 1 << 49;
    const PRIMITIVE_ID = 1 << 50;
    const INSTANCE_ID = 1 << 51;
    const RENDER_TARGET_ARRAY_INDEX = 1 << 52;
    const VIEWPORT_ARRAY_INDEX = 1 << 53;
  }
}

impl PinComponent {
  /// Texture coordinate set `index`, for `index < 16`.
  pub fn tex_coord(index: u32) -> Option<Self> {
    Self::nth(Self::TEX_COORD0, index, 16)
  }

  /// User-defined component `index`, for `index < 16`.
  pub fn user(index: u32) -> Option<Self> {
    Self::nth(Self::USER0, index, 16)
  }

  /// Render target `index`, for `index < 8`.
  pub fn render_target(index: u32) -> Option<Self> {
    Self::nth(Self::RENDER_TARGET0, index, 8)
  }

  fn nth(first: Self, index: u32, count: u32) -> Option<Self> {
    if index < count {
      Self::from_bits(first.bits() << index)
    } else {
      None
    }
  }

  /// Whether this value names exactly one component.
  pub fn is_single(self) -> bool {
    self.bits().count_ones() == 1
  }
}
