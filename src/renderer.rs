//! Drawing a [`Scene`] through a [`PerspectiveCamera`].
//!
//! [`SceneRenderer`] is the seam between the viewer and the GPU: the viewer
//! only ever sizes the output and asks for a frame. [`MeshRenderer`] is the
//! wgpu implementation. It clears to the scene background, then draws every
//! mesh node with depth testing and its material's flat color.
//!
//! Drawing is antialiased: the pass renders into a [`SAMPLE_COUNT`]-sample
//! color target and resolves it into the surface texture.
//!
//! # Bind groups
//!
//! - **Group 0**: camera uniforms (view-projection matrix)
//! - **Group 1**: model uniforms (model matrix, color), one buffer per mesh node

use std::collections::HashMap;

use crate::camera::PerspectiveCamera;
use crate::error::Result;
use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex3d};
use crate::scene::{Color, NodeId, Scene};

/// Output side of the viewer.
pub trait SceneRenderer {
    /// Resize the output buffer, in physical pixels.
    fn set_size(&mut self, width: u32, height: u32);

    fn size(&self) -> (u32, u32);

    /// Physical pixels per logical pixel of the target.
    ///
    /// Sizes passed to [`set_size`](Self::set_size) are already physical, so
    /// this is informational for renderers that draw at a fixed pixel grid.
    fn set_pixel_ratio(&mut self, ratio: f64);

    /// Draw one frame.
    ///
    /// Returns `false` when the frame was skipped without presenting, for
    /// example while the surface is being reconfigured.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<bool>;
}

/// Samples per pixel of the color and depth attachments.
pub const SAMPLE_COUNT: u32 = 4;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

/// A mesh node's GPU buffers.
struct GpuMesh {
    mesh: Mesh,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
}

/// wgpu renderer for mesh nodes with unlit flat-color materials.
///
/// Owns the [`GpuContext`]; dropping the renderer releases the device,
/// the surface and every uploaded mesh.
pub struct MeshRenderer {
    gpu: GpuContext,
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    model_bind_group_layout: wgpu::BindGroupLayout,
    msaa_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    target_size: (u32, u32),
    meshes: HashMap<NodeId, GpuMesh>,
}

impl MeshRenderer {
    pub fn new(gpu: GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        // Camera uniform buffer (group 0)
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout = uniform_layout(device, "Camera Bind Group Layout");

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Model uniforms (group 1), bound per mesh
        let model_bind_group_layout = uniform_layout(device, "Model Bind Group Layout");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &model_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex3d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: SAMPLE_COUNT,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        });

        let (msaa_view, depth_view) = create_targets(&gpu);
        let target_size = (gpu.width(), gpu.height());

        Self {
            gpu,
            pipeline,
            camera_buffer,
            camera_bind_group,
            model_bind_group_layout,
            msaa_view,
            depth_view,
            target_size,
            meshes: HashMap::new(),
        }
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    /// Recreates the multisampled color and depth targets if the surface
    /// size changed.
    fn ensure_target_size(&mut self) {
        let size = (self.gpu.width(), self.gpu.height());
        if self.target_size != size {
            (self.msaa_view, self.depth_view) = create_targets(&self.gpu);
            self.target_size = size;
        }
    }

    /// Uploads mesh nodes not seen before.
    fn upload_new_meshes(&mut self, scene: &Scene) {
        for (id, node) in scene.meshes() {
            if self.meshes.contains_key(&id) {
                continue;
            }

            let model_buffer = self.gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Model Uniforms"),
                size: std::mem::size_of::<ModelUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let model_bind_group = self
                .gpu
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Model Bind Group"),
                    layout: &self.model_bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: model_buffer.as_entire_binding(),
                    }],
                });

            tracing::debug!(
                %id,
                triangles = node.geometry.triangle_count(),
                "uploading mesh"
            );

            self.meshes.insert(
                id,
                GpuMesh {
                    mesh: node.geometry.upload(&self.gpu),
                    model_buffer,
                    model_bind_group,
                },
            );
        }
    }

    /// Colors are authored in sRGB; sRGB targets expect linear values.
    fn output_color(&self, color: Color) -> Color {
        if self.gpu.config.format.is_srgb() {
            color.to_linear()
        } else {
            color
        }
    }
}

impl SceneRenderer for MeshRenderer {
    fn set_size(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.ensure_target_size();
    }

    fn size(&self) -> (u32, u32) {
        (self.gpu.width(), self.gpu.height())
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        tracing::debug!(ratio, "pixel ratio changed");
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<bool> {
        self.ensure_target_size();
        self.upload_new_meshes(scene);

        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("surface lost or outdated, reconfiguring");
                self.gpu.reconfigure();
                return Ok(false);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::debug!("surface timed out, skipping frame");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let camera_uniforms = CameraUniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
        };
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniforms]),
        );

        for (id, node) in scene.meshes() {
            if let Some(gpu_mesh) = self.meshes.get(&id) {
                let model_uniforms = ModelUniforms {
                    model: node.transform.matrix().to_cols_array_2d(),
                    color: self.output_color(node.material.color).to_array(),
                };
                self.gpu.queue.write_buffer(
                    &gpu_mesh.model_buffer,
                    0,
                    bytemuck::cast_slice(&[model_uniforms]),
                );
            }
        }

        let background = self.output_color(scene.background);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.msaa_view,
                    resolve_target: Some(&view),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: background.r as f64,
                            g: background.g as f64,
                            b: background.b as f64,
                            a: background.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

            for (id, _) in scene.meshes() {
                let Some(gpu_mesh) = self.meshes.get(&id) else {
                    continue;
                };
                render_pass.set_bind_group(1, &gpu_mesh.model_bind_group, &[]);
                render_pass.set_vertex_buffer(0, gpu_mesh.mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(
                    gpu_mesh.mesh.index_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                render_pass.draw_indexed(0..gpu_mesh.mesh.index_count, 0, 0..1);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(true)
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Descriptor for a multisampled render attachment matching the surface.
fn target_descriptor(
    label: &'static str,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> wgpu::TextureDescriptor<'static> {
    wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: SAMPLE_COUNT,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    }
}

/// Multisampled color view and depth view sized to the surface.
fn create_targets(gpu: &GpuContext) -> (wgpu::TextureView, wgpu::TextureView) {
    let (width, height) = (gpu.width(), gpu.height());
    let color = gpu.device.create_texture(&target_descriptor(
        "MSAA Color Texture",
        gpu.config.format,
        width,
        height,
    ));
    let depth = gpu.device.create_texture(&target_descriptor(
        "Depth Texture",
        DEPTH_FORMAT,
        width,
        height,
    ));
    (
        color.create_view(&wgpu::TextureViewDescriptor::default()),
        depth.create_view(&wgpu::TextureViewDescriptor::default()),
    )
}
