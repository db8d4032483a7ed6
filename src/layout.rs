/// Pixel placement of modules on a square canvas.
///
/// Raster and vector output share one [`GridLayout`] so module `(col, row)` always
/// lands on the same pixels in both.
///
/// When the canvas holds at least one pixel per module, every module is
/// `size / n` pixels wide and the leftover slack is split into a centering margin.
/// Smaller canvases spread modules with `floor(i * size / n)` edges instead: spans
/// never overlap or leave gaps, and some modules collapse to zero width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    size: u32,
    modules: u32,
    module_size: u32,
    margin: u32,
}

impl GridLayout {
    /// Lays out `modules` modules on a `size` pixel canvas.
    pub fn new(size: u32, modules: u32) -> Self {
        let modules = modules.max(1);
        let module_size = size / modules;
        let margin = (size - module_size * modules) / 2;
        Self { size, modules, module_size, margin }
    }

    /// Pixel edge length of one module, zero when the canvas is smaller than the grid.
    pub fn module_size(&self) -> u32 {
        self.module_size
    }

    /// Offset of the first module on both axes.
    pub fn margin(&self) -> u32 {
        self.margin
    }

    /// Half-open pixel range `[start, end)` covered by module `index` on either axis.
    pub fn span(&self, index: u32) -> (u32, u32) {
        if self.module_size > 0 {
            let start = self.margin + self.module_size * index;
            (start, start + self.module_size)
        } else {
            let edge = |i: u32| (u64::from(i) * u64::from(self.size) / u64::from(self.modules)) as u32;
            (edge(index), edge(index + 1))
        }
    }
}
