use shadegraph::{prelude::*, shader_code::NodeKind};

fn vertex_shader() -> Result<ShaderCode> {
  CodeGenerator::build(BindingStage::VertexShader, |gen| {
    let position = gen.input::<V3<f32>>(PinComponent::POSITION)?;
    let uv = gen.input::<V2<f32>>(PinComponent::TEX_COORD0)?;
    let mvp = gen.constant::<M44>("model_view_projection")?;
    let time = gen.constant::<f32>("time")?;

    // wobble along y, then project
    let wobble = gen.fixed(V3([0f32, 0.1, 0.])) * &time;
    let position = gen.expand::<V4<f32>, _>(&(&position + wobble), ExpandType::AddOnesAtW)?;
    let clip = &mvp * &position;

    gen.output(PinComponent::POSITION, &clip)?;
    gen.output(PinComponent::TEX_COORD0, &uv)
  })
}

fn pixel_shader() -> Result<ShaderCode> {
  CodeGenerator::build(BindingStage::PixelShader, |gen| {
    let uv = gen.input::<V2<f32>>(PinComponent::TEX_COORD0)?;
    let albedo = gen.create_texture_2d::<V4<f32>>("albedo")?;
    let sampler = gen.create_sampler("linear")?;
    let weights = gen.constant_array_sized::<f32>("blur_weights", 4)?;

    // accumulate a few shifted samples
    let count = weights.size();
    let acc = gen.fixed(V4([0f32; 4]));
    let mut l = gen.begin_loop(&count, &acc)?;
    let i = l.iteration_index()?;
    let shift = gen.compound::<V2<f32>>(&[&weights.at(&i), &gen.fixed(0f32)])?;
    let texel = albedo.sample(&sampler, &(&uv + shift));
    let next = l.value() + texel * weights.at(&i);
    l.set_value(&next)?;
    let color = gen.end_loop(l)?;

    let opaque = color.w().gte(1.);
    let color = gen.branch(&opaque, &color, &color.with_w(&gen.fixed(1f32)))?;

    gen.output(PinComponent::RENDER_TARGET0, &color)
  })
}

fn dump(name: &str, code: &ShaderCode) {
  println!("{} ({:?}), {} nodes", name, code.stage(), code.nodes().len());

  for p in code.parameters() {
    println!("  parameter {}: {:?}", p.name, p.signature);
  }

  for id in code.sorted_operations() {
    if let Some(node) = code.node(id) {
      let kind = match node.kind() {
        NodeKind::Input => "input".to_owned(),
        NodeKind::Output => "output".to_owned(),
        NodeKind::Constant(c) => format!("constant {:?}", c),
        NodeKind::Operation(op) => op.name().to_owned(),
      };

      println!("  {:?}: {} <- {:?}", id, kind, node.inputs().iter().map(Pin::node).collect::<Vec<_>>());
    }
  }
}

fn main() -> Result<()> {
  env_logger::init();

  dump("vertex shader", &vertex_shader()?);
  dump("pixel shader", &pixel_shader()?);

  Ok(())
}
