//! Picture relationship IDs, per slide.
//!
//! Media relationships are created before any slide XML is rendered. A
//! slide's pictures take their rIds from here in the order the pictures
//! appear in the shape tree.

#[derive(Debug, Default)]
pub struct RelationshipMapper {
    /// `slides[i][n]` is the rId of the n-th picture on slide `i`
    slides: Vec<Vec<String>>,
}

impl RelationshipMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the rId of the next picture on `slide_index`.
    pub fn push_image(&mut self, slide_index: usize, rel_id: String) {
        if self.slides.len() <= slide_index {
            self.slides.resize_with(slide_index + 1, Vec::new);
        }
        self.slides[slide_index].push(rel_id);
    }

    pub fn image_id(&self, slide_index: usize, picture_index: usize) -> Option<&str> {
        self.slides
            .get(slide_index)?
            .get(picture_index)
            .map(String::as_str)
    }
}
