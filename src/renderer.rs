use crate::camera::Camera;
use crate::constants::*;
use crate::systems::RenderTile;
use glow::*;
use std::mem;
use std::sync::Arc;

const TILE_VERTEX_SHADER_SRC: &str = r#"#version 330 core
layout (location = 0) in vec2 aPos;

uniform mat4 u_projection;
uniform vec2 u_position;
uniform float u_extent;
uniform float u_deformation;

out vec2 vLocal;

void main() {
    // Squash across and stretch along while the grid is moving fast
    vec2 stretch = vec2(1.0 - u_deformation, 1.0 + u_deformation);
    vLocal = aPos;
    vec2 worldPos = u_position + aPos * u_extent * stretch;
    gl_Position = u_projection * vec4(worldPos, 0.0, 1.0);
}
"#;

const TILE_FRAGMENT_SHADER_SRC: &str = r#"#version 330 core
in vec2 vLocal;

uniform float u_size_px;
uniform float u_opacity;
uniform float u_center_progress;
uniform int u_platform_flag;
uniform float u_corner_radius;
uniform vec3 u_tile_color;
uniform vec3 u_focus_color;
uniform vec3 u_background;

out vec4 FragColor;

float roundedBox(vec2 p, vec2 halfSize, float radius) {
    vec2 q = abs(p) - halfSize + radius;
    return length(max(q, 0.0)) + min(max(q.x, q.y), 0.0) - radius;
}

void main() {
    // Distances in pixels keep the edge one pixel soft at any size
    vec2 p = vLocal * u_size_px;
    float halfPx = 0.5 * u_size_px;
    float d = roundedBox(p, vec2(halfPx), u_size_px * u_corner_radius);
    float coverage = clamp(0.5 - d, 0.0, 1.0);

    vec3 color = mix(u_tile_color, u_focus_color, u_center_progress);
    float alpha = coverage * u_opacity;

    if (u_platform_flag != 0) {
        // Compositors that mishandle alpha get an opaque pre-blended color
        FragColor = vec4(mix(u_background, color, alpha), 1.0);
    } else {
        FragColor = vec4(color, alpha);
    }
}
"#;

struct TileUniforms {
    projection: NativeUniformLocation,
    position: NativeUniformLocation,
    extent: NativeUniformLocation,
    deformation: NativeUniformLocation,
    size_px: NativeUniformLocation,
    opacity: NativeUniformLocation,
    center_progress: NativeUniformLocation,
    platform_flag: NativeUniformLocation,
    corner_radius: NativeUniformLocation,
    tile_color: NativeUniformLocation,
    focus_color: NativeUniformLocation,
    background: NativeUniformLocation,
}

pub struct Renderer {
    gl: Arc<glow::Context>,
    program: NativeProgram,
    vao: NativeVertexArray,
    vbo: NativeBuffer,
    uniforms: TileUniforms,
}

impl Renderer {
    pub fn new(gl: Arc<glow::Context>) -> Result<Self, String> {
        unsafe {
            let program = compile_program(&gl, TILE_VERTEX_SHADER_SRC, TILE_FRAGMENT_SHADER_SRC)?;

            let uniform = |name: &str| {
                gl.get_uniform_location(program, name)
                    .ok_or_else(|| format!("Failed to get {} uniform location", name))
            };
            let uniforms = TileUniforms {
                projection: uniform("u_projection")?,
                position: uniform("u_position")?,
                extent: uniform("u_extent")?,
                deformation: uniform("u_deformation")?,
                size_px: uniform("u_size_px")?,
                opacity: uniform("u_opacity")?,
                center_progress: uniform("u_center_progress")?,
                platform_flag: uniform("u_platform_flag")?,
                corner_radius: uniform("u_corner_radius")?,
                tile_color: uniform("u_tile_color")?,
                focus_color: uniform("u_focus_color")?,
                background: uniform("u_background")?,
            };

            // Unit quad centered on the origin
            let vertices: [f32; 12] = [
                -0.5, -0.5, // bottom-left
                0.5, -0.5, // bottom-right
                0.5, 0.5, // top-right
                -0.5, -0.5, // bottom-left
                0.5, 0.5, // top-right
                -0.5, 0.5, // top-left
            ];

            let vao = gl
                .create_vertex_array()
                .map_err(|e| format!("Failed to create VAO: {}", e))?;
            gl.bind_vertex_array(Some(vao));

            let vbo = gl
                .create_buffer()
                .map_err(|e| format!("Failed to create VBO: {}", e))?;
            gl.bind_buffer(ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(ARRAY_BUFFER, as_u8_slice(&vertices), STATIC_DRAW);

            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, FLOAT, false, 8, 0);

            gl.bind_vertex_array(None);

            let [r, g, b] = BACKGROUND_COLOR;
            gl.clear_color(r, g, b, 1.0);

            gl.enable(BLEND);
            gl.blend_func(SRC_ALPHA, ONE_MINUS_SRC_ALPHA);

            Ok(Self {
                gl,
                program,
                vao,
                vbo,
                uniforms,
            })
        }
    }

    pub fn resize(&self, width: i32, height: i32) {
        unsafe {
            self.gl.viewport(0, 0, width, height);
        }
    }

    pub fn clear(&self) {
        unsafe {
            self.gl.clear(COLOR_BUFFER_BIT);
        }
    }

    /// Draw tiles in the order given.
    pub fn render_tiles(&self, camera: &Camera, tiles: &[RenderTile]) {
        puffin::profile_function!();
        if tiles.is_empty() {
            return;
        }

        let u = &self.uniforms;
        unsafe {
            self.gl.use_program(Some(self.program));
            self.gl.bind_vertex_array(Some(self.vao));

            let projection = camera.projection_matrix();
            self.gl
                .uniform_matrix_4_f32_slice(Some(&u.projection), false, projection.as_ref());
            self.gl.uniform_1_f32(Some(&u.corner_radius), TILE_CORNER_RADIUS);
            let [r, g, b] = TILE_COLOR;
            self.gl.uniform_3_f32(Some(&u.tile_color), r, g, b);
            let [r, g, b] = TILE_FOCUS_COLOR;
            self.gl.uniform_3_f32(Some(&u.focus_color), r, g, b);
            let [r, g, b] = BACKGROUND_COLOR;
            self.gl.uniform_3_f32(Some(&u.background), r, g, b);

            for tile in tiles {
                let params = &tile.params;
                self.gl
                    .uniform_2_f32(Some(&u.position), tile.position.x, tile.position.y);
                self.gl.uniform_1_f32(Some(&u.extent), tile.extent);
                self.gl.uniform_1_f32(Some(&u.deformation), params.deformation);
                self.gl.uniform_1_f32(Some(&u.size_px), params.size_in_pixels);
                self.gl.uniform_1_f32(Some(&u.opacity), params.opacity);
                self.gl
                    .uniform_1_f32(Some(&u.center_progress), params.center_progress);
                self.gl
                    .uniform_1_i32(Some(&u.platform_flag), params.platform_flag as i32);
                self.gl.draw_arrays(TRIANGLES, 0, 6);
            }

            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.program);
            self.gl.delete_vertex_array(self.vao);
            self.gl.delete_buffer(self.vbo);
        }
    }
}

unsafe fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<NativeProgram, String> {
    let vertex_shader = gl
        .create_shader(VERTEX_SHADER)
        .map_err(|e| format!("Failed to create vertex shader: {}", e))?;
    gl.shader_source(vertex_shader, vertex_src);
    gl.compile_shader(vertex_shader);
    if !gl.get_shader_compile_status(vertex_shader) {
        return Err(gl.get_shader_info_log(vertex_shader));
    }

    let fragment_shader = gl
        .create_shader(FRAGMENT_SHADER)
        .map_err(|e| format!("Failed to create fragment shader: {}", e))?;
    gl.shader_source(fragment_shader, fragment_src);
    gl.compile_shader(fragment_shader);
    if !gl.get_shader_compile_status(fragment_shader) {
        return Err(gl.get_shader_info_log(fragment_shader));
    }

    let program = gl
        .create_program()
        .map_err(|e| format!("Failed to create program: {}", e))?;
    gl.attach_shader(program, vertex_shader);
    gl.attach_shader(program, fragment_shader);
    gl.link_program(program);
    if !gl.get_program_link_status(program) {
        return Err(gl.get_program_info_log(program));
    }

    gl.delete_shader(vertex_shader);
    gl.delete_shader(fragment_shader);
    Ok(program)
}

fn as_u8_slice<T>(data: &[T]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            data.as_ptr() as *const u8,
            data.len() * mem::size_of::<T>(),
        )
    }
}
