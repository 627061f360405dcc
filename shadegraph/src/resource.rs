//! Textures, samplers and interfaces.
//!
//! Resources are opaque: they only enter the DAG as named constants and are only consumed by the operations made for
//! them, [sampling](CodeGenerator::sample) and [loading](CodeGenerator::load) for textures.

use std::marker::PhantomData;

use crate::{
  binder::{Binder, PinArray},
  error::{built, Result},
  format::{PinFormat, PinSignature},
  generator::CodeGenerator,
  operation::Operation,
  types::{ToFormat, Typed, V2, V3, V4},
};

/// Texture dimensions.
pub trait TextureDimension {
  /// Format of textures of this dimension.
  const FORMAT: PinFormat;
}

/// Dimensions that can be sampled.
pub trait Sampleable: TextureDimension {
  /// Floating-point address of a sample.
  type Address;
}

/// Dimensions whose texels can be loaded directly.
pub trait Loadable: TextureDimension {
  /// Integer position of a texel, mip level included, except for buffers.
  type Position;
}

/// Dimensions accepting a texel offset when sampling or loading.
pub trait Offsettable: TextureDimension {
  type Offset;
}

macro_rules! make_dim {
  ($(#[$doc:meta])* $dim:ident, $format:ident) => {
    $(#[$doc])*
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub struct $dim;

    impl TextureDimension for $dim {
      const FORMAT: PinFormat = PinFormat::$format;
    }
  };
}

make_dim!(
  /// 1D textures.
  Dim1,
  Texture1D
);
make_dim!(
  /// Arrays of 1D textures.
  Dim1Array,
  Texture1DArray
);
make_dim!(
  /// 2D textures.
  Dim2,
  Texture2D
);
make_dim!(
  /// Arrays of 2D textures.
  Dim2Array,
  Texture2DArray
);
make_dim!(
  /// Cube maps.
  Cube,
  TextureCube
);
make_dim!(
  /// 3D textures.
  Dim3,
  Texture3D
);
make_dim!(
  /// Buffer textures.
  Buffer,
  BufferTexture
);

impl Sampleable for Dim1 {
  type Address = f32;
}

impl Sampleable for Dim1Array {
  type Address = V2<f32>;
}

impl Sampleable for Dim2 {
  type Address = V2<f32>;
}

impl Sampleable for Dim2Array {
  type Address = V3<f32>;
}

impl Sampleable for Cube {
  type Address = V3<f32>;
}

impl Sampleable for Dim3 {
  type Address = V3<f32>;
}

impl Loadable for Buffer {
  type Position = i32;
}

impl Loadable for Dim1 {
  type Position = V2<i32>;
}

impl Loadable for Dim1Array {
  type Position = V3<i32>;
}

impl Loadable for Dim2 {
  type Position = V3<i32>;
}

impl Loadable for Dim2Array {
  type Position = V4<i32>;
}

impl Loadable for Dim3 {
  type Position = V4<i32>;
}

impl Offsettable for Dim1 {
  type Offset = i32;
}

impl Offsettable for Dim1Array {
  type Offset = i32;
}

impl Offsettable for Dim2 {
  type Offset = V2<i32>;
}

impl Offsettable for Dim2Array {
  type Offset = V2<i32>;
}

impl Offsettable for Dim3 {
  type Offset = V3<i32>;
}

/// Texture of dimension `D` whose texels are `T`.
#[derive(Debug)]
pub struct Texture<D, T> {
  _phantom: PhantomData<(D, T)>,
}

impl<D, T> ToFormat for Texture<D, T>
where
  D: TextureDimension,
  T: ToFormat,
{
  const FORMAT: PinFormat = D::FORMAT;
  const TEXTURE_FORMAT: PinFormat = T::FORMAT;
}

impl<D, T> Typed for Texture<D, T>
where
  D: TextureDimension,
  T: ToFormat,
{
  fn accepts(sig: &PinSignature) -> bool {
    *sig == Self::signature()
  }
}

/// Sampler state.
#[derive(Debug)]
pub struct Sampler;

impl ToFormat for Sampler {
  const FORMAT: PinFormat = PinFormat::Sampler;
}

impl Typed for Sampler {
  fn accepts(sig: &PinSignature) -> bool {
    *sig == Self::signature()
  }
}

/// Shader interface, bound by the host.
#[derive(Debug)]
pub struct Interface;

impl ToFormat for Interface {
  const FORMAT: PinFormat = PinFormat::Interface;
}

impl Typed for Interface {
  fn accepts(sig: &PinSignature) -> bool {
    *sig == Self::signature()
  }
}

pub type TextureBinder<D, T> = Binder<Texture<D, T>>;
pub type SamplerBinder = Binder<Sampler>;
pub type InterfaceBinder = Binder<Interface>;

impl CodeGenerator {
  /// Declare a named texture.
  pub fn create_texture<D, T>(&self, name: &str) -> Result<TextureBinder<D, T>>
  where
    D: TextureDimension,
    T: ToFormat,
  {
    self.constant(name)
  }

  pub fn create_texture_1d<T>(&self, name: &str) -> Result<TextureBinder<Dim1, T>>
  where
    T: ToFormat,
  {
    self.create_texture(name)
  }

  pub fn create_texture_1d_array<T>(&self, name: &str) -> Result<TextureBinder<Dim1Array, T>>
  where
    T: ToFormat,
  {
    self.create_texture(name)
  }

  pub fn create_texture_2d<T>(&self, name: &str) -> Result<TextureBinder<Dim2, T>>
  where
    T: ToFormat,
  {
    self.create_texture(name)
  }

  pub fn create_texture_2d_array<T>(&self, name: &str) -> Result<TextureBinder<Dim2Array, T>>
  where
    T: ToFormat,
  {
    self.create_texture(name)
  }

  pub fn create_texture_cube<T>(&self, name: &str) -> Result<TextureBinder<Cube, T>>
  where
    T: ToFormat,
  {
    self.create_texture(name)
  }

  pub fn create_texture_3d<T>(&self, name: &str) -> Result<TextureBinder<Dim3, T>>
  where
    T: ToFormat,
  {
    self.create_texture(name)
  }

  pub fn create_texture_buffer<T>(&self, name: &str) -> Result<TextureBinder<Buffer, T>>
  where
    T: ToFormat,
  {
    self.create_texture(name)
  }

  /// Declare a named sampler.
  pub fn create_sampler(&self, name: &str) -> Result<SamplerBinder> {
    self.constant(name)
  }

  /// Declare a named interface.
  pub fn create_interface(&self, name: &str) -> Result<InterfaceBinder> {
    self.constant(name)
  }

  /// Declare a named array of interfaces.
  pub fn create_interface_array(&self, name: &str) -> Result<PinArray<Interface>> {
    self.constant_array(name)
  }

  /// Sample `texture` with `sampler` at `address`.
  pub fn sample<D, T>(
    &self,
    texture: &TextureBinder<D, T>,
    sampler: &SamplerBinder,
    address: &Binder<D::Address>,
  ) -> Result<Binder<T>>
  where
    D: Sampleable,
    T: ToFormat + Typed,
  {
    self.insert_one(
      Operation::Sample,
      vec![texture.into(), sampler.into(), address.into()],
    )
  }

  /// Sample `texture` with `sampler` at `address`, shifted by `offset` texels.
  pub fn sample_offset<D, T>(
    &self,
    texture: &TextureBinder<D, T>,
    sampler: &SamplerBinder,
    address: &Binder<D::Address>,
    offset: &Binder<D::Offset>,
  ) -> Result<Binder<T>>
  where
    D: Sampleable + Offsettable,
    T: ToFormat + Typed,
  {
    self.insert_one(
      Operation::Sample,
      vec![texture.into(), sampler.into(), address.into(), offset.into()],
    )
  }

  /// Fetch the texel of `texture` at `position`.
  pub fn load<D, T>(&self, texture: &TextureBinder<D, T>, position: &Binder<D::Position>) -> Result<Binder<T>>
  where
    D: Loadable,
    T: ToFormat + Typed,
  {
    self.insert_one(Operation::Load, vec![texture.into(), position.into()])
  }

  /// Fetch the texel of `texture` at `position`, shifted by `offset` texels.
  pub fn load_offset<D, T>(
    &self,
    texture: &TextureBinder<D, T>,
    position: &Binder<D::Position>,
    offset: &Binder<D::Offset>,
  ) -> Result<Binder<T>>
  where
    D: Loadable + Offsettable,
    T: ToFormat + Typed,
  {
    self.insert_one(Operation::Load, vec![texture.into(), position.into(), offset.into()])
  }
}

impl<D, T> Binder<Texture<D, T>>
where
  T: ToFormat + Typed,
{
  /// Sample the texture.
  ///
  /// # Panics
  ///
  /// If `sampler` or `address` come from another generator.
  pub fn sample(&self, sampler: &SamplerBinder, address: &Binder<D::Address>) -> Binder<T>
  where
    D: Sampleable,
  {
    built(self.generator().sample(self, sampler, address))
  }

  pub fn sample_offset(
    &self,
    sampler: &SamplerBinder,
    address: &Binder<D::Address>,
    offset: &Binder<D::Offset>,
  ) -> Binder<T>
  where
    D: Sampleable + Offsettable,
  {
    built(self.generator().sample_offset(self, sampler, address, offset))
  }

  /// Fetch a texel.
  ///
  /// # Panics
  ///
  /// If `position` comes from another generator.
  pub fn load(&self, position: &Binder<D::Position>) -> Binder<T>
  where
    D: Loadable,
  {
    built(self.generator().load(self, position))
  }

  pub fn load_offset(&self, position: &Binder<D::Position>, offset: &Binder<D::Offset>) -> Binder<T>
  where
    D: Loadable + Offsettable,
  {
    built(self.generator().load_offset(self, position, offset))
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{error::Error, format::ArraySize, stage::BindingStage};

  #[test]
  fn declarations() {
    let gen = CodeGenerator::new(BindingStage::PixelShader);
    let albedo = gen.create_texture_2d::<V4<f32>>("albedo").unwrap();
    let sampler = gen.create_sampler("linear").unwrap();
    let lights = gen.create_interface_array("lights").unwrap();

    assert_eq!(
      albedo.signature(),
      PinSignature::texture(PinFormat::Texture2D, PinFormat::Floatx4)
    );
    assert_eq!(sampler.format(), PinFormat::Sampler);
    assert_eq!(lights.signature().array, ArraySize::Dynamic);
    assert_eq!(
      gen.create_sampler("linear").err(),
      Some(Error::DuplicateConstant("linear".to_owned()))
    );
  }

  #[test]
  fn sampling() {
    let gen = CodeGenerator::new(BindingStage::PixelShader);
    let albedo = gen.create_texture_2d::<V4<f32>>("albedo").unwrap();
    let sampler = gen.create_sampler("linear").unwrap();
    let uv = gen.input::<V2<f32>>(crate::stage::PinComponent::TEX_COORD0).unwrap();
    let offset = gen.fixed(V2([1i32, 0]));

    let color: Binder<V4<f32>> = albedo.sample(&sampler, &uv);
    let shifted = albedo.sample_offset(&sampler, &uv, &offset);

    let code = gen.shader_code();
    assert_eq!(
      code.producer(color.pin()).unwrap().inputs(),
      &[albedo.pin(), sampler.pin(), uv.pin()]
    );
    assert_eq!(code.producer(shifted.pin()).unwrap().inputs().len(), 4);
  }

  #[test]
  fn loading() {
    let gen = CodeGenerator::new(BindingStage::PixelShader);
    let depth = gen.create_texture_2d::<f32>("depth").unwrap();
    let texels = gen.create_texture_buffer::<V4<u32>>("texels").unwrap();
    let position = gen.fixed(V3([4i32, 2, 0]));
    let index = gen.fixed(7i32);

    assert_eq!(depth.load(&position).format(), PinFormat::Float);
    assert_eq!(texels.load(&index).format(), PinFormat::UIntegerx4);
  }

  #[test]
  fn cube_sampling() {
    let gen = CodeGenerator::new(BindingStage::PixelShader);
    let sky = gen.create_texture_cube::<V4<f32>>("sky").unwrap();
    let sampler = gen.create_sampler("s").unwrap();
    let dir = gen.fixed(V3([0f32, 1., 0.]));

    assert_eq!(sky.sample(&sampler, &dir).format(), PinFormat::Floatx4);
  }
}
