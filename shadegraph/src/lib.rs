//! Shadegraph, a typed shader DAG builder in vanilla Rust.
//!
//! This crate provides an [EDSL] to build [shaders] as _data flow graphs_ rather than as text. Shader code is a directed
//! acyclic graph (DAG) of operation nodes linked by typed pins: a node consumes the pins of earlier nodes and produces
//! new pins. Constants, stage inputs and stage outputs are nodes too. Because the graph is plain data, this crate is
//! completely language agnostic: a backend walks the graph and emits [GLSL], [HLSL], SPIR-V or anything else.
//!
//! # Motivation
//!
//! Shaders are usually _opaque strings_, assembled by concatenating fragments of code and checked by the graphics driver
//! at runtime. Errors such as adding a `vec3` to a `vec4` only show up when the driver refuses the code, far away from
//! the Rust code that produced it.
//!
//! This crate builds the shader graph through a fluent, typed API instead. Values are [`Binder`](binder::Binder)s
//! parameterized by the Rust type they carry (`f32`, [`V3<f32>`](types::V3), [`M44`](types::M44)…), so that adding a
//! `Binder<V3<f32>>` to a `Binder<V4<f32>>` is a `rustc` error. Everything that cannot be checked statically, such as
//! reading a swizzle out of a dynamically created binder, is checked when the node is inserted and reported as an
//! [`Error`](error::Error). A failed insertion leaves the graph untouched.
//!
//! # Building a shader
//!
//! A [`CodeGenerator`](generator::CodeGenerator) is created for a given [`BindingStage`](stage::BindingStage). It owns
//! the graph being built, and every binder it hands out remembers which generator created it:
//!
//! ```
//! use shadegraph::prelude::*;
//!
//! let gen = CodeGenerator::new_vertex_shader();
//!
//! let position = gen.input::<V4<f32>>(PinComponent::POSITION)?;
//! let mvp = gen.constant::<M44>("model_view_projection")?;
//! let color = gen.input::<V4<f32>>(PinComponent::COLOUR)?;
//!
//! gen.output(PinComponent::POSITION, &(&mvp * &position))?;
//! gen.output(PinComponent::COLOUR, &color)?;
//!
//! let code = gen.finish()?;
//! assert_eq!(code.output_components(), PinComponent::POSITION | PinComponent::COLOUR);
//! # Ok::<_, shadegraph::error::Error>(())
//! ```
//!
//! Operators (`+`, `*`, `!`…) are implemented for binders and accept host constants on either side; they panic when
//! given binders from different generators. The methods of [`CodeGenerator`](generator::CodeGenerator) do the same
//! work and return a [`Result`](error::Result).
//!
//! # What’s in the graph
//!
//! - Arithmetic, comparisons, boolean logic and reductions, in [`ops`] and [`generator`].
//! - Swizzle reads and writes, in [`swizzle`]. With the `swizzle` feature (enabled by default), the named accessors
//!   such as `v.zyx()` and `v.with_xy(&value)` are available.
//! - Array reads, writes and sizes, in [`array`].
//! - Counted and conditional loops carrying values across iterations, in [`loops`].
//! - Textures, samplers and interfaces, in [`resource`].
//! - Compound construction, expansion and user-defined operations, in [`generator`] and [`operation`].
//!
//! Once built, the [`ShaderCode`](shader_code::ShaderCode) can be inspected: its nodes, their producers and consumers,
//! its parameters and a dependency-sorted order of operations.
//!
//! [EDSL]: https://en.wikipedia.org/wiki/Domain-specific_language#External_and_Embedded_Domain_Specific_Languages
//! [shaders]: https://en.wikipedia.org/wiki/Shader
//! [GLSL]: https://www.khronos.org/registry/OpenGL/specs/gl/GLSLangSpec.4.60.pdf
//! [HLSL]: https://docs.microsoft.com/en-us/windows/win32/direct3dhlsl/dx-graphics-hlsl

pub mod array;
pub mod binder;
pub mod constant;
pub mod error;
pub mod format;
pub mod generator;
pub mod loops;
pub mod operation;
pub mod ops;
pub mod resource;
pub mod shader_code;
pub mod stage;
pub mod swizzle;
pub mod types;

/// Everything needed to build a shader.
pub mod prelude {
  pub use crate::{
    array::ArrayIndex,
    binder::{
      AnyBinder, Binder, Boolx1, Boolx2, Boolx3, Boolx4, ErasedBinder, Float2x2, Float3x3, Float4x4, Floatx1, Floatx2,
      Floatx3, Floatx4, Integerx1, Integerx2, Integerx3, Integerx4, PinArray, PinBinder, UIntegerx1, UIntegerx2,
      UIntegerx3, UIntegerx4,
    },
    constant::ConstantValue,
    error::{Error, Result},
    format::{ArraySize, PinFormat, PinSignature},
    generator::{CodeGenerator, CompoundPart},
    loops::{Loop, Loop1, Loop2, LoopController},
    operation::{CompareFunction, CustomOperation, ExpandType},
    resource::{
      Buffer, Cube, Dim1, Dim1Array, Dim2, Dim2Array, Dim3, Interface, InterfaceBinder, Sampler, SamplerBinder, Texture,
      TextureBinder,
    },
    shader_code::{Pin, ShaderCode},
    stage::{BindingStage, PinComponent},
    sw,
    swizzle::{Swizzlable, Swizzle, SwizzleSelector},
    types::{M22, M33, M44, V2, V3, V4},
  };
}
