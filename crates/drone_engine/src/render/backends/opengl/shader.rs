//! Shader compilation and linking
//!
//! One-shot utility: compile a vertex and a fragment stage from GLSL source,
//! link them, and hand back the program. Failures are logged with the
//! driver's info log and degrade to [`ShaderHandle::INVALID`] rather than
//! aborting; uniform writes against that handle are no-ops.

use std::num::NonZeroU32;

use glow::HasContext;

use crate::render::backend::{BackendResult, RenderError, ShaderHandle};

/// Convert a linked program into the backend-neutral handle
pub(crate) const fn program_handle(program: glow::NativeProgram) -> ShaderHandle {
    ShaderHandle(program.0.get())
}

/// Convert a handle back into a program, `None` for the invalid handle
pub(crate) fn native_program(shader: ShaderHandle) -> Option<glow::NativeProgram> {
    NonZeroU32::new(shader.0).map(glow::NativeProgram)
}

fn stage_name(stage: u32) -> &'static str {
    match stage {
        glow::VERTEX_SHADER => "vertex",
        glow::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    }
}

/// Compile one shader stage
fn compile_stage(gl: &glow::Context, stage: u32, source: &str) -> BackendResult<glow::NativeShader> {
    // SAFETY: the caller holds a current context; the shader is deleted on failure
    unsafe {
        let shader = gl.create_shader(stage).map_err(RenderError::ResourceCreation)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if gl.get_shader_compile_status(shader) {
            Ok(shader)
        } else {
            let info = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            Err(RenderError::Shader(format!("{} stage failed to compile: {}", stage_name(stage), info.trim())))
        }
    }
}

/// Compile, link and validate a program from two GLSL sources
///
/// Returns `Err` on any compile or link failure; the stage objects are always
/// deleted before returning.
pub fn try_create_shader_program(gl: &glow::Context, vertex_src: &str, fragment_src: &str) -> BackendResult<ShaderHandle> {
    let vertex = compile_stage(gl, glow::VERTEX_SHADER, vertex_src)?;
    let fragment = match compile_stage(gl, glow::FRAGMENT_SHADER, fragment_src) {
        Ok(fragment) => fragment,
        Err(e) => {
            // SAFETY: `vertex` was created above on the same context
            unsafe { gl.delete_shader(vertex) };
            return Err(e);
        }
    };

    // SAFETY: both stages were compiled on this context and are detached and
    // deleted before returning
    unsafe {
        let program = match gl.create_program() {
            Ok(program) => program,
            Err(e) => {
                gl.delete_shader(vertex);
                gl.delete_shader(fragment);
                return Err(RenderError::ResourceCreation(e));
            }
        };

        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);

        let linked = gl.get_program_link_status(program);
        gl.detach_shader(program, vertex);
        gl.detach_shader(program, fragment);
        gl.delete_shader(vertex);
        gl.delete_shader(fragment);

        if linked {
            Ok(program_handle(program))
        } else {
            let info = gl.get_program_info_log(program);
            gl.delete_program(program);
            Err(RenderError::Shader(format!("program failed to link: {}", info.trim())))
        }
    }
}

/// Compile and link a program, logging any failure
///
/// Never fails hard: a broken program shows up as visibly wrong rendering,
/// with the compiler or linker message in the log.
pub fn create_shader_program(gl: &glow::Context, vertex_src: &str, fragment_src: &str) -> ShaderHandle {
    match try_create_shader_program(gl, vertex_src, fragment_src) {
        Ok(handle) => {
            log::info!("Shader program {} linked", handle.0);
            handle
        }
        Err(e) => {
            log::error!("Shader program creation failed: {}", e);
            ShaderHandle::INVALID
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_handle_has_no_program() {
        assert!(native_program(ShaderHandle::INVALID).is_none());
        assert_eq!(native_program(ShaderHandle(5)).map(|p| p.0.get()), Some(5));
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(stage_name(glow::VERTEX_SHADER), "vertex");
        assert_eq!(stage_name(glow::FRAGMENT_SHADER), "fragment");
    }
}
