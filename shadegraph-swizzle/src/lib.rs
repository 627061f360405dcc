//! Named swizzle accessors for `shadegraph` binders.
//!
//! Every vector binder supports swizzling through a single trait, `Swizzlable`, keyed by the selectors of a mask. Writing
//! `Swizzlable::<[SwizzleSelector; 2]>::swizzle(&v, [SwizzleSelector::Z, SwizzleSelector::X])` is tedious though, and
//! the handy `v.zx()` form requires one method per mask: 340 of them for a 4D vector, plus the setters. This crate
//! generates them.
//!
//! ```ignore
//! swizzles!(V4, 4);
//! ```
//!
//! expands to a single `impl<S> Binder<V4<S>>` block containing, for every mask of one to four letters among `x`,
//! `y`, `z` and `w`:
//!
//! - A getter named after the mask (`xy()`, `wzyx()`, `xx()`…).
//! - If the mask doesn’t repeat a letter, a setter (`with_xy(&value)`…) returning the updated vector.
//!
//! The macro is meant to be invoked from within `shadegraph` only, as the generated code refers to its items with
//! `crate::` paths.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
  parse::{Parse, ParseStream},
  parse_macro_input, Ident, LitInt, Token,
};

const LETTERS: [char; 4] = ['x', 'y', 'z', 'w'];
const SELECTORS: [&str; 4] = ["X", "Y", "Z", "W"];

#[derive(Debug)]
struct SwizzleInput {
  ty: Ident,
  width: usize,
}

impl Parse for SwizzleInput {
  fn parse(input: ParseStream) -> syn::Result<Self> {
    let ty = input.parse()?;
    let _: Token![,] = input.parse()?;
    let lit: LitInt = input.parse()?;
    let width = lit.base10_parse()?;

    if !(2..=4).contains(&width) {
      return Err(syn::Error::new(lit.span(), "vector width must be 2, 3 or 4"));
    }

    Ok(SwizzleInput { ty, width })
  }
}

/// Every mask of one to `width` components, each component below `width`, shortest first.
fn masks(width: usize) -> Vec<Vec<usize>> {
  let mut masks = Vec::new();
  let mut current = vec![Vec::new()];

  for _ in 0..width {
    current = current
      .iter()
      .flat_map(|mask: &Vec<usize>| {
        (0..width).map(move |c| {
          let mut mask = mask.clone();
          mask.push(c);
          mask
        })
      })
      .collect();

    masks.extend(current.iter().cloned());
  }

  masks
}

fn has_repeats(mask: &[usize]) -> bool {
  mask
    .iter()
    .enumerate()
    .any(|(i, c)| mask[i + 1..].contains(c))
}

fn mask_name(mask: &[usize]) -> String {
  mask.iter().map(|&c| LETTERS[c]).collect()
}

/// Type of the selector argument of `Swizzlable` for a mask of `len` components.
fn selector_ty(len: usize) -> proc_macro2::TokenStream {
  if len == 1 {
    quote! { crate::swizzle::SwizzleSelector }
  } else {
    quote! { [crate::swizzle::SwizzleSelector; #len] }
  }
}

/// Selector argument value for `mask`.
fn selector(mask: &[usize]) -> proc_macro2::TokenStream {
  let sels = mask.iter().map(|&c| {
    let sel = Ident::new(SELECTORS[c], Span::call_site());
    quote! { crate::swizzle::SwizzleSelector::#sel }
  });

  if mask.len() == 1 {
    quote! { #(#sels)* }
  } else {
    quote! { [#(#sels),*] }
  }
}

fn accessors(mask: &[usize]) -> proc_macro2::TokenStream {
  let name = mask_name(mask);
  let getter = Ident::new(&name, Span::call_site());
  let sel_ty = selector_ty(mask.len());
  let sel = selector(mask);
  let getter_doc = format!("Swizzle `.{}`.", name);

  let read = quote! {
    #[doc = #getter_doc]
    #[inline]
    pub fn #getter(&self) -> <Self as crate::swizzle::Swizzlable<#sel_ty>>::Output {
      crate::error::built(crate::swizzle::Swizzlable::<#sel_ty>::swizzle(self, #sel))
    }
  };

  if has_repeats(mask) {
    return read;
  }

  let setter = Ident::new(&format!("with_{}", name), Span::call_site());
  let setter_doc = format!(
    "Replace `.{}` with `value`, returning the updated vector.\n\n# Panics\n\nIf `value` comes from another code generator.",
    name
  );

  quote! {
    #read

    #[doc = #setter_doc]
    #[inline]
    pub fn #setter(&self, value: &<Self as crate::swizzle::Swizzlable<#sel_ty>>::Output) -> Self {
      crate::error::built(crate::swizzle::Swizzlable::<#sel_ty>::with_swizzle(self, #sel, value))
    }
  }
}

/// Generate the named swizzle accessors of a vector binder.
///
/// Takes the vector type (`V2`, `V3` or `V4`) and its width.
#[proc_macro]
pub fn swizzles(tokens: TokenStream) -> TokenStream {
  let SwizzleInput { ty, width } = parse_macro_input!(tokens as SwizzleInput);

  let bounds = (1..=width).map(selector_ty);
  let methods = masks(width).into_iter().map(|mask| accessors(&mask));

  let q = quote! {
    impl<S> crate::binder::Binder<crate::types::#ty<S>>
    where
      #(crate::binder::Binder<crate::types::#ty<S>>: crate::swizzle::Swizzlable<#bounds>,)*
    {
      #(#methods)*
    }
  };

  q.into()
}
