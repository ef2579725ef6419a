use super::ShaderSource;

/// Built-in programs available without explicit registration.
///
/// `Outline` and `Particle` are not used by the duel scene; they ship so
/// scenes can opt into them by name.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Preset {
    SimpleColor,
    Texture,
    Outline,
    Particle,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::SimpleColor,
        Preset::Texture,
        Preset::Outline,
        Preset::Particle,
    ];

    /// Registry key for the preset.
    pub const fn name(self) -> &'static str {
        match self {
            Preset::SimpleColor => "simple",
            Preset::Texture => "texture",
            Preset::Outline => "outline",
            Preset::Particle => "particle",
        }
    }

    pub fn source(self) -> ShaderSource {
        let (vertex_body, fragment_body, textured) = match self {
            Preset::SimpleColor => (PLAIN_VERTEX, SOLID_FRAGMENT, false),
            Preset::Texture => (PLAIN_VERTEX, TEXTURE_FRAGMENT, true),
            Preset::Outline => (OUTLINE_VERTEX, SOLID_FRAGMENT, false),
            Preset::Particle => (PARTICLE_VERTEX, PARTICLE_FRAGMENT, true),
        };

        let vertex = format!("{UNIFORMS}{VERTEX_IO}{vertex_body}");
        let fragment = if textured {
            format!("{UNIFORMS}{TEXTURE_BINDINGS}{fragment_body}")
        } else {
            format!("{UNIFORMS}{fragment_body}")
        };

        ShaderSource::new(vertex, fragment)
    }
}

// ── shared declarations ───────────────────────────────────────────────────

const UNIFORMS: &str = r#"
struct QuadUniforms {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
    model: mat4x4<f32>,
    color: vec4<f32>,
    tint_color: vec4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> quad: QuadUniforms;
"#;

const VERTEX_IO: &str = r#"
struct VertexIn {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
};

struct VertexOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
};
"#;

const TEXTURE_BINDINGS: &str = r#"
@group(1) @binding(0) var texture_sampler: texture_2d<f32>;
@group(1) @binding(1) var linear_sampler: sampler;
"#;

// ── vertex stages ─────────────────────────────────────────────────────────

const PLAIN_VERTEX: &str = r#"
@vertex
fn vs_main(v: VertexIn) -> VertexOut {
    var o: VertexOut;
    o.clip = quad.projection * quad.view * quad.model * vec4<f32>(v.position, 0.0, 1.0);
    o.uv = v.uv;
    return o;
}
"#;

// params.y: outline width in model units, added on every side.
const OUTLINE_VERTEX: &str = r#"
@vertex
fn vs_main(v: VertexIn) -> VertexOut {
    var o: VertexOut;
    let grown = v.position + sign(v.position) * quad.params.y;
    o.clip = quad.projection * quad.view * quad.model * vec4<f32>(grown, 0.0, 1.0);
    o.uv = v.uv;
    return o;
}
"#;

// params.x: time in seconds.
const PARTICLE_VERTEX: &str = r#"
@vertex
fn vs_main(v: VertexIn) -> VertexOut {
    var o: VertexOut;
    let wave = sin(quad.params.x * 3.0 + v.position.x * 2.0) * 0.1;
    let p = vec4<f32>(v.position.x, v.position.y + wave, 0.0, 1.0);
    o.clip = quad.projection * quad.view * quad.model * p;
    o.uv = v.uv;
    return o;
}
"#;

// ── fragment stages ───────────────────────────────────────────────────────

const SOLID_FRAGMENT: &str = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return quad.color;
}
"#;

const TEXTURE_FRAGMENT: &str = r#"
@fragment
fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
    let texel = textureSample(texture_sampler, linear_sampler, uv);
    if (texel.a < 0.01) {
        discard;
    }
    return vec4<f32>(texel.rgb * quad.tint_color.rgb, texel.a * quad.tint_color.a);
}
"#;

const PARTICLE_FRAGMENT: &str = r#"
@fragment
fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
    return textureSample(texture_sampler, linear_sampler, uv) * quad.tint_color;
}
"#;
