use wgpu::util::DeviceExt;

// Corners of the full-screen quad in clip space, in triangle strip order.
const CORNERS: [[f32; 2]; 4] = [[1.0, 1.0], [-1.0, 1.0], [1.0, -1.0], [-1.0, -1.0]];

const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

// Static geometry shared by the simulation and rendering passes.
pub struct QuadGeometry {
    vertex_buf: wgpu::Buffer,
    vertex_count: u32,
}

impl QuadGeometry {
    pub fn init(device: &wgpu::Device) -> Self {
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad vertex buffer"),
            contents: bytemuck::cast_slice(&CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        QuadGeometry {
            vertex_buf,
            vertex_count: CORNERS.len() as u32,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }

    pub fn primitive() -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            ..Default::default()
        }
    }

    pub fn render<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>) {
        // Assume the pipeline and its bind groups have been set by the caller.
        rpass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        rpass.draw(0..self.vertex_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_covers_clip_space() {
        let xs: Vec<f32> = CORNERS.iter().map(|c| c[0]).collect();
        let ys: Vec<f32> = CORNERS.iter().map(|c| c[1]).collect();
        for v in xs.iter().chain(ys.iter()) {
            assert_eq!(v.abs(), 1.0);
        }
        assert_eq!(QuadGeometry::layout().array_stride, 8);
    }
}
