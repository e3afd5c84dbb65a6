use crate::cells::MazeCell;

pub trait GridDisplay {
    /// Render the contents of a created grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: &MazeCell) -> String {
        String::from("   ")
    }
}
