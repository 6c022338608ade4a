//! Immediate-mode draw commands.
//!
//! The viewer rebuilds a [`DrawList`] every frame. Each [`DrawBatch`] carries
//! its own projection and model-view matrices so the engine can draw geometry
//! in any local frame without the caller touching GPU state.

use glam::{Mat4, Vec3, Vec4};

/// A colored vertex, laid out for upload as an instance attribute.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    #[must_use]
    pub fn new(position: Vec3, color: Vec4) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }
}

/// How the vertices of a batch are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// One round sprite per vertex.
    Points,
    /// One segment per consecutive vertex pair.
    Lines,
}

/// Geometry drawn with a single projection, model-view and size.
#[derive(Debug, Clone)]
pub struct DrawBatch {
    pub primitive: Primitive,
    /// Clip-from-viewer matrix.
    pub projection: Mat4,
    /// Viewer-from-local matrix.
    pub model_view: Mat4,
    /// Point diameter or line width, in pixels.
    pub size: f32,
    pub vertices: Vec<Vertex>,
}

impl DrawBatch {
    /// Appends a point.
    pub fn point(&mut self, position: Vec3, color: Vec4) {
        self.vertices.push(Vertex::new(position, color));
    }

    /// Appends a segment with a single color.
    pub fn line(&mut self, from: Vec3, to: Vec3, color: Vec4) {
        self.vertices.push(Vertex::new(from, color));
        self.vertices.push(Vertex::new(to, color));
    }

    /// Appends a segment whose color is interpolated between its ends.
    pub fn line_gradient(&mut self, from: Vec3, from_color: Vec4, to: Vec3, to_color: Vec4) {
        self.vertices.push(Vertex::new(from, from_color));
        self.vertices.push(Vertex::new(to, to_color));
    }

    /// Clip-from-local matrix.
    #[must_use]
    pub fn clip_from_local(&self) -> Mat4 {
        self.projection * self.model_view
    }

    /// Number of points or complete segments. A dangling line vertex is ignored.
    #[must_use]
    pub fn element_count(&self) -> usize {
        match self.primitive {
            Primitive::Points => self.vertices.len(),
            Primitive::Lines => self.vertices.len() / 2,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.element_count() == 0
    }
}

/// Everything to draw for one frame.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    /// Background color; alpha is ignored.
    pub clear_color: Vec3,
    pub batches: Vec<DrawBatch>,
}

impl DrawList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all batches and sets the background color.
    pub fn clear(&mut self, clear_color: Vec3) {
        self.clear_color = clear_color;
        self.batches.clear();
    }

    /// Starts a new batch and returns it for filling.
    pub fn batch(
        &mut self,
        primitive: Primitive,
        projection: Mat4,
        model_view: Mat4,
        size: f32,
    ) -> &mut DrawBatch {
        self.batches.push(DrawBatch {
            primitive,
            projection,
            model_view,
            size,
            vertices: Vec::new(),
        });
        let last = self.batches.len() - 1;
        &mut self.batches[last]
    }

    /// Total points across all point batches.
    #[must_use]
    pub fn num_points(&self) -> usize {
        self.count(Primitive::Points)
    }

    /// Total segments across all line batches.
    #[must_use]
    pub fn num_lines(&self) -> usize {
        self.count(Primitive::Lines)
    }

    fn count(&self, primitive: Primitive) -> usize {
        self.batches
            .iter()
            .filter(|b| b.primitive == primitive)
            .map(DrawBatch::element_count)
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.iter().all(DrawBatch::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 28);
    }

    #[test]
    fn test_clear_drops_batches() {
        let mut list = DrawList::new();
        list.batch(Primitive::Points, Mat4::IDENTITY, Mat4::IDENTITY, 3.0)
            .point(Vec3::ZERO, Vec4::ONE);
        assert_eq!(list.num_points(), 1);
        list.clear(Vec3::new(0.1, 0.2, 0.3));
        assert!(list.batches.is_empty());
        assert!(list.is_empty());
        assert_eq!(list.clear_color, Vec3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_counts_by_primitive() {
        let mut list = DrawList::new();
        let points = list.batch(Primitive::Points, Mat4::IDENTITY, Mat4::IDENTITY, 3.0);
        points.point(Vec3::X, Vec4::ONE);
        points.point(Vec3::Y, Vec4::ONE);
        let lines = list.batch(Primitive::Lines, Mat4::IDENTITY, Mat4::IDENTITY, 1.0);
        lines.line(Vec3::ZERO, Vec3::X, Vec4::ONE);
        lines.line_gradient(Vec3::ZERO, Vec4::ONE, Vec3::Y, Vec4::ZERO);
        assert_eq!(list.num_points(), 2);
        assert_eq!(list.num_lines(), 2);
    }

    #[test]
    fn test_dangling_line_vertex_ignored() {
        let mut list = DrawList::new();
        let lines = list.batch(Primitive::Lines, Mat4::IDENTITY, Mat4::IDENTITY, 1.0);
        lines.point(Vec3::ZERO, Vec4::ONE);
        assert_eq!(lines.element_count(), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_clip_from_local_order() {
        let mut list = DrawList::new();
        let projection = Mat4::from_scale(Vec3::splat(2.0));
        let model_view = Mat4::from_translation(Vec3::X);
        let batch = list.batch(Primitive::Points, projection, model_view, 1.0);
        let p = batch.clip_from_local().transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(2.0, 0.0, 0.0));
    }
}
