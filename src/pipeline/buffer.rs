/// Dense 2D grid of width * height elements, stored row-major with row 0 at
/// the top of the image. Shared by the render target (rgb8 colors) and the
/// depth buffer (f32 depth values).
///
/// Indices always come from validated pixel coordinates, so an out of bounds
/// access is a programming error and panics instead of being reported.
pub struct Buffer<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T: Copy + Default> Buffer<T> {
    /// Allocates a width x height buffer with every cell default-initialized.
    pub fn new(width: u32, height: u32) -> Buffer<T> {
        return Buffer {
            width,
            height,
            data: vec![T::default(); (width * height) as usize],
        };
    }

    pub fn width(&self) -> u32 {
        return self.width;
    }

    pub fn height(&self) -> u32 {
        return self.height;
    }

    /// Mutable access to the cell at (x, y). The sole write primitive.
    pub fn item(&mut self, x: u32, y: u32) -> &mut T {
        assert!(x < self.width && y < self.height, "buffer access out of bounds");
        return &mut self.data[(x + y * self.width) as usize];
    }

    /// Read access to the cell at (x, y).
    pub fn get(&self, x: u32, y: u32) -> T {
        assert!(x < self.width && y < self.height, "buffer access out of bounds");
        return self.data[(x + y * self.width) as usize];
    }

    /// Assigns value to every cell.
    pub fn clear(&mut self, value: T) {
        for cell in &mut self.data {
            *cell = value;
        }
    }
}
