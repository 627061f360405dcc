use shadegraph::{
  operation::Operation,
  prelude::*,
  shader_code::{Constant, NodeKind},
};

fn init_logger() {
  let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn vertex_transform() {
  init_logger();

  let gen = CodeGenerator::new_vertex_shader();
  let position = gen.input::<V4<f32>>(PinComponent::POSITION).unwrap();
  let matrix = gen.constant::<M44>("Matrix").unwrap();
  let transformed = &position * &matrix;
  gen.output(PinComponent::POSITION, &transformed).unwrap();

  let code = gen.finish().unwrap();
  let nodes = code.nodes();

  assert_eq!(nodes.len(), 4);
  assert!(matches!(nodes[0].kind(), NodeKind::Input));
  assert!(matches!(nodes[1].kind(), NodeKind::Output));
  assert!(matches!(nodes[2].kind(), NodeKind::Constant(Constant::Named(name)) if name == "Matrix"));
  assert!(matches!(nodes[3].operation(), Some(Operation::Mul)));

  assert_eq!(nodes[3].inputs(), &[position.pin(), matrix.pin()]);
  assert_eq!(nodes[3].outputs(), &[transformed.pin()]);
  assert_eq!(code.input(PinComponent::POSITION), Some(position.pin()));
  assert_eq!(code.output(PinComponent::POSITION), Some(transformed.pin()));
  assert_eq!(code.output_node().inputs(), &[transformed.pin()]);

  let order = nodes.iter().map(|node| node.id()).collect::<Vec<_>>();
  assert_eq!(code.sorted_operations(), vec![order[0], order[2], order[3], order[1]]);
}

#[test]
fn branch() {
  let gen = CodeGenerator::new_pixel_shader();
  let cond = gen.constant::<bool>("enabled").unwrap();
  let a = gen.fixed(1f32);
  let b = gen.fixed(0f32);
  let selected = gen.branch(&cond, &a, &b).unwrap();

  let code = gen.shader_code();
  assert_eq!(code.nodes().len(), 2 + 3 + 1);

  for constant in &[&a, &b] {
    assert!(matches!(
      code.producer(constant.pin()).unwrap().kind(),
      NodeKind::Constant(Constant::Fixed(ConstantValue::Float(_)))
    ));
  }

  let node = code.producer(selected.pin()).unwrap();
  assert!(matches!(node.operation(), Some(Operation::Branch)));
  assert_eq!(node.inputs(), &[cond.pin(), a.pin(), b.pin()]);
  assert_eq!(node.outputs(), &[selected.pin()]);
  assert_eq!(selected.format(), PinFormat::Float);
}

#[test]
fn host_constants_on_either_side() {
  let gen = CodeGenerator::new_pixel_shader();
  let a = gen.input::<f32>(PinComponent::USER0).unwrap();
  let before = gen.shader_code().nodes().len();

  let right = &a + 2.;
  let left = 2. + &a;

  let code = gen.shader_code();
  assert_eq!(code.nodes().len(), before + 4);

  let right = code.producer(right.pin()).unwrap();
  let left = code.producer(left.pin()).unwrap();
  assert_eq!(right.inputs()[0], a.pin());
  assert_eq!(left.inputs()[1], a.pin());

  for k in &[right.inputs()[1], left.inputs()[0]] {
    assert!(matches!(
      code.producer(*k).unwrap().kind(),
      NodeKind::Constant(Constant::Fixed(ConstantValue::Float(v))) if *v == 2.
    ));
  }
}

#[test]
fn subtraction_keeps_operand_order() {
  let gen = CodeGenerator::new_pixel_shader();
  let a = gen.constant::<V2<f32>>("a").unwrap();
  let b = gen.constant::<V2<f32>>("b").unwrap();

  let ab = &a - &b;
  let ba = &b / &a;

  let code = gen.shader_code();
  assert_eq!(code.producer(ab.pin()).unwrap().inputs(), &[a.pin(), b.pin()]);
  assert_eq!(code.producer(ba.pin()).unwrap().inputs(), &[b.pin(), a.pin()]);
}

#[test]
fn swizzle_write_is_a_new_pin() {
  let gen = CodeGenerator::new_pixel_shader();
  let v = gen.input::<V4<f32>>(PinComponent::COLOUR).unwrap();

  for &c in &["x", "y", "z", "w"] {
    let sw = c.parse::<Swizzle>().unwrap();
    let read = gen.swizzle::<_, f32>(&v, sw).unwrap();
    let written = gen.write_swizzle(&v, sw, &read).unwrap();

    assert_ne!(written.pin(), v.pin());
    assert_eq!(written.format(), PinFormat::Floatx4);
    assert!(matches!(
      gen.shader_code().producer(written.pin()).unwrap().operation(),
      Some(Operation::WriteSwizzle(_))
    ));
  }
}

#[test]
fn named_accessors_match_swizzle_macro() {
  let gen = CodeGenerator::new_pixel_shader();
  let v = gen.input::<V4<f32>>(PinComponent::COLOUR).unwrap();

  let named = v.zyx();
  let by_macro = sw!(v, .b.g.r).unwrap();
  assert_eq!(named.format(), by_macro.format());

  let code = gen.shader_code();
  let named = code.producer(named.pin()).unwrap();
  let by_macro = code.producer(by_macro.pin()).unwrap();
  match (named.operation(), by_macro.operation()) {
    (Some(Operation::Swizzle(a)), Some(Operation::Swizzle(b))) => assert_eq!(a, b),
    ops => panic!("unexpected operations: {:?}", ops),
  }
}

#[test]
fn identity_loop() {
  let gen = CodeGenerator::new_pixel_shader();
  let count = gen.constant::<u32>("count").unwrap();
  let v0 = gen.fixed(V3([0.25f32, 0.5, 0.75]));

  let l = gen.begin_loop(&count, &v0).unwrap();
  let out = gen.end_loop(l).unwrap();

  assert_ne!(out.pin(), v0.pin());
  assert_eq!(gen.shader_code().passthrough_source(out.pin()), v0.pin());
}

#[test]
fn nested_identity_loops() {
  let gen = CodeGenerator::new_pixel_shader();
  let count = gen.constant::<u32>("count").unwrap();
  let a = gen.fixed(1f32);
  let b = gen.fixed(2i32);

  let mut outer = gen.begin_loop2(&count, &a, &b).unwrap();
  let inside = outer.value1();
  let inner = gen.begin_loop(&count, &inside).unwrap();
  let carried = gen.end_loop(inner).unwrap();
  let bumped = outer.value2() + 1;
  outer.set_value2(&bumped).unwrap();
  let (a_out, b_out) = gen.end_loop(outer).unwrap();

  let code = gen.shader_code();
  assert_eq!(code.passthrough_source(carried.pin()), inside.pin());
  assert_eq!(code.passthrough_source(a_out.pin()), a.pin());
  assert_eq!(code.passthrough_source(b_out.pin()), b_out.pin());
}

#[test]
fn while_loop_carries_values() {
  let gen = CodeGenerator::new_pixel_shader();
  let x = gen.fixed(1f32);
  let limit = gen.constant::<f32>("limit").unwrap();

  let mut l = gen.begin_while(&[&x]).unwrap();
  let current = l.get(0).unwrap().downcast::<f32>().unwrap();
  let next = &current * 2.;
  l.set(0, &next).unwrap();
  let out = gen.end_while(l, &next.lt(&limit)).unwrap();

  assert_eq!(out.len(), 1);
  assert_eq!(out[0].format(), PinFormat::Float);
  assert_ne!(gen.shader_code().passthrough_source(out[0].pin()), x.pin());
}

#[test]
fn cross_generator_rejection() {
  let g1 = CodeGenerator::new_vertex_shader();
  let g2 = CodeGenerator::new_vertex_shader();
  let a = g1.fixed(V2([1f32, 2.]));
  let b = g2.fixed(V2([3f32, 4.]));
  let n1 = g1.shader_code().nodes().len();
  let n2 = g2.shader_code().nodes().len();

  assert_eq!(g1.add(&a, &b).err(), Some(Error::GeneratorMismatch));
  assert_eq!(g1.sub(&a, &b).err(), Some(Error::GeneratorMismatch));
  assert_eq!(g1.mul(&a, &b).err(), Some(Error::GeneratorMismatch));
  assert_eq!(g1.div(&a, &b).err(), Some(Error::GeneratorMismatch));
  assert_eq!(g2.add(&a, &b).err(), Some(Error::GeneratorMismatch));
  assert_eq!(g1.output(PinComponent::TEX_COORD0, &b).err(), Some(Error::GeneratorMismatch));

  assert_eq!(g1.shader_code().nodes().len(), n1);
  assert_eq!(g2.shader_code().nodes().len(), n2);
  assert_eq!(g1.shader_code().output(PinComponent::TEX_COORD0), None);
}

#[test]
#[should_panic(expected = "operands belong to different code generators")]
fn cross_generator_operator_panics() {
  let a = CodeGenerator::new_vertex_shader().fixed(1f32);
  let b = CodeGenerator::new_vertex_shader().fixed(2f32);

  let _ = &a * &b;
}

#[test]
fn array_write_then_read() {
  let gen = CodeGenerator::new_vertex_shader();
  let arr = gen.constant_array::<f32>("weights").unwrap();
  let x = gen.input::<f32>(PinComponent::BLEND_WEIGHTS).unwrap();
  let i = gen.constant::<i32>("i").unwrap();

  let literal = arr.with(2u32, &x);
  let by_binder = arr.with(&i, &x);

  let reads = [(literal.at(2u32), &literal), (by_binder.at(&i), &by_binder)];

  let code = gen.shader_code();
  for (read, written) in &reads {
    let index = code.producer(read.pin()).unwrap();
    assert!(matches!(index.operation(), Some(Operation::Index)));
    assert_eq!(index.inputs()[0], written.pin());
    assert_ne!(index.inputs()[0], arr.pin());

    let write = code.producer(written.pin()).unwrap();
    assert!(matches!(write.operation(), Some(Operation::WriteIndex)));
    assert_eq!(write.inputs()[2], x.pin());
  }
}

#[test]
fn output_last_write_wins() {
  let gen = CodeGenerator::new_pixel_shader();
  let red = gen.fixed(V4([1f32, 0., 0., 1.]));
  let blue = gen.fixed(V4([0f32, 0., 1., 1.]));

  gen.output(PinComponent::RENDER_TARGET0, &red).unwrap();
  gen.output(PinComponent::RENDER_TARGET0, &blue).unwrap();

  let code = gen.finish().unwrap();
  assert_eq!(code.output(PinComponent::RENDER_TARGET0), Some(blue.pin()));
  assert_eq!(code.output_node().inputs(), &[blue.pin()]);
}

#[test]
fn create_from_keeps_integer_vector_width() {
  let gen = CodeGenerator::new_vertex_shader();
  let p = gen.fixed(V2([1i32, 2]));

  match gen.create_from(p.pin()).unwrap() {
    AnyBinder::Integerx2(b) => assert_eq!(b.pin(), p.pin()),
    other => panic!("expected an Integerx2 binder, got {:?}", other),
  }

  let p = gen.fixed(V4([1i32, 2, 3, 4]));
  assert!(matches!(gen.create_from(p.pin()).unwrap(), AnyBinder::Integerx4(_)));
}

#[test]
fn loop_state_errors() {
  let gen = CodeGenerator::new_pixel_shader();
  let count = gen.fixed(3u32);
  let v = gen.fixed(0f32);

  let outer = gen.begin_loop(&count, &v).unwrap();
  let mut inner = gen.begin_loop(&count, &v).unwrap();

  assert!(matches!(gen.end_loop(outer), Err(Error::InvalidLoopState(_))));
  assert!(matches!(inner.set_value(&v), Ok(())));
  gen.end_loop(inner).unwrap();

  let w = gen.begin_while(&[&v]).unwrap();
  assert!(matches!(gen.end_loop(w), Err(Error::InvalidLoopState(_))));

  assert!(matches!(gen.finish(), Err(Error::InvalidLoopState(_))));
}

#[test]
fn compound_mixed_generators() {
  let g1 = CodeGenerator::new_vertex_shader();
  let g2 = CodeGenerator::new_vertex_shader();
  let xy = g1.fixed(V2([0f32, 1.]));
  let z = g2.fixed(2f32);

  let mixed = CodeGenerator::compound_of::<V4<f32>>(&[(&xy).into(), (&z).into(), 1f32.into()]);
  assert_eq!(mixed.err(), Some(Error::MixedGenerators));

  let ok = CodeGenerator::compound_of::<V4<f32>>(&[(&xy).into(), 0f32.into(), 1f32.into()]).unwrap();
  assert_eq!(ok.generator(), &g1);
  assert_eq!(ok.format(), PinFormat::Floatx4);

  let none = CodeGenerator::compound_of::<V2<f32>>(&[0f32.into(), 1f32.into()]);
  assert_eq!(none.err(), Some(Error::NullArgument("compound binder")));
}
