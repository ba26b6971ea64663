//! Text rendering of CPU arrays
//!
//! Output follows NumPy's `str()`: nested brackets, one row per line, and
//! `...` in place of the middle of long axes once the array is larger than
//! the configured threshold.

use std::cell::RefCell;
use std::fmt;

use ndstride_core::{Array, PrintOptions, Scalar};

use crate::storage::Buffer;
use crate::CpuArray;

thread_local! {
    static PRINT_OPTIONS: RefCell<PrintOptions> = RefCell::new(PrintOptions::default());
}

/// Replace the print options used by `Display` on this thread.
pub fn set_print_options(options: PrintOptions) {
    PRINT_OPTIONS.with(|current| *current.borrow_mut() = options);
}

/// The print options currently in effect on this thread.
pub fn print_options() -> PrintOptions {
    PRINT_OPTIONS.with(|current| current.borrow().clone())
}

/// Run `f` with `options` in effect, restoring the previous options after.
pub fn with_print_options<R>(options: PrintOptions, f: impl FnOnce() -> R) -> R {
    struct Restore(Option<PrintOptions>);

    impl Drop for Restore {
        fn drop(&mut self) {
            if let Some(previous) = self.0.take() {
                set_print_options(previous);
            }
        }
    }

    let previous = PRINT_OPTIONS.with(|current| current.replace(options));
    let _restore = Restore(Some(previous));
    f()
}

fn format_float(x: f64, precision: usize) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let text = format!("{x:.precision$}");
    match text.find('.') {
        Some(_) => text.trim_end_matches('0').to_string(),
        None => text + ".",
    }
}

fn format_scalar(value: &Scalar, precision: usize) -> String {
    match value {
        Scalar::Float(x) => format_float(*x, precision),
        other => other.to_string(),
    }
}

/// Positions printed along an axis of length `len`; `None` marks the `...`.
fn shown(len: usize, summarise: bool, edge_items: usize) -> Vec<Option<usize>> {
    if summarise && len > 2 * edge_items {
        (0..edge_items)
            .map(Some)
            .chain(std::iter::once(None))
            .chain((len - edge_items..len).map(Some))
            .collect()
    } else {
        (0..len).map(Some).collect()
    }
}

/// Column widths shared by every cell so that columns line up.
enum CellWidth {
    /// Floats align on the decimal point.
    Float { int: usize, frac: usize },
    /// Everything else is right-aligned.
    Right(usize),
}

impl CellWidth {
    fn measure(cells: &[String], float: bool) -> Self {
        if float {
            let (mut int, mut frac) = (0, 0);
            for cell in cells {
                let (i, f) = split_decimal(cell);
                int = int.max(i.len());
                frac = frac.max(f.len());
            }
            CellWidth::Float { int, frac }
        } else {
            CellWidth::Right(cells.iter().map(String::len).max().unwrap_or(0))
        }
    }

    fn pad(&self, cell: &str) -> String {
        match *self {
            CellWidth::Float { int, frac } => {
                let (i, f) = split_decimal(cell);
                format!("{i:>int$}{f:<frac$}")
            }
            CellWidth::Right(width) => format!("{cell:>width$}"),
        }
    }
}

fn split_decimal(cell: &str) -> (&str, &str) {
    match cell.find('.') {
        Some(pos) => cell.split_at(pos),
        None => (cell, ""),
    }
}

struct Renderer<'a> {
    buffer: &'a Buffer,
    shape: &'a [usize],
    strides: &'a [isize],
    summarise: bool,
    options: &'a PrintOptions,
}

impl Renderer<'_> {
    /// Call `visit` with the buffer offset of every printed element.
    fn visit(&self, axis: usize, offset: isize, visit: &mut dyn FnMut(usize)) {
        if axis == self.shape.len() {
            visit(offset as usize);
            return;
        }
        let stride = self.strides[axis];
        for pos in shown(self.shape[axis], self.summarise, self.options.edge_items)
            .into_iter()
            .flatten()
        {
            self.visit(axis + 1, offset + pos as isize * stride, visit);
        }
    }

    fn render(&self, axis: usize, offset: isize, width: &CellWidth, out: &mut String) {
        let ndim = self.shape.len();
        if axis == ndim {
            let cell = format_scalar(&self.buffer.get(offset as usize), self.options.precision);
            out.push_str(&width.pad(&cell));
            return;
        }

        let stride = self.strides[axis];
        out.push('[');
        let positions = shown(self.shape[axis], self.summarise, self.options.edge_items);
        for (i, pos) in positions.into_iter().enumerate() {
            if i > 0 {
                if axis + 1 == ndim {
                    out.push_str(&self.options.separator);
                } else {
                    out.push_str(self.options.separator.trim_end());
                    out.push_str(&"\n".repeat(ndim - axis - 1));
                    out.push_str(&" ".repeat(axis + 1));
                }
            }
            match pos {
                Some(pos) => self.render(axis + 1, offset + pos as isize * stride, width, out),
                None => out.push_str("..."),
            }
        }
        out.push(']');
    }
}

fn render_array(arr: &CpuArray, options: &PrintOptions) -> String {
    if arr.size() == 0 {
        return "[]".to_string();
    }

    let buffer = arr.buffer();
    let renderer = Renderer {
        buffer: &buffer,
        shape: arr.shape(),
        strides: arr.strides(),
        summarise: arr.size() > options.threshold,
        options,
    };
    let start = arr.offset() as isize;

    let mut cells = Vec::new();
    renderer.visit(0, start, &mut |offset| {
        cells.push(format_scalar(&buffer.get(offset), options.precision));
    });
    let width = CellWidth::measure(&cells, arr.dtype().is_float());

    let mut out = String::new();
    renderer.render(0, start, &width, &mut out);
    out
}

impl fmt::Display for CpuArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = print_options();
        f.write_str(&render_array(self, &options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CpuBackend;
    use ndstride_core::{ops::CreationOps, DType, Nested};

    fn ints(data: Vec<i64>, shape: Vec<usize>) -> CpuArray {
        CpuArray::from_buffer(Buffer::Int64(data), shape)
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0, 8), "1.");
        assert_eq!(format_float(2.5, 8), "2.5");
        assert_eq!(format_float(1.0 / 3.0, 4), "0.3333");
        assert_eq!(format_float(3.0, 0), "3.");
        assert_eq!(format_float(f64::NAN, 8), "nan");
        assert_eq!(format_float(f64::NEG_INFINITY, 8), "-inf");
    }

    #[test]
    fn test_display_1d() {
        assert_eq!(ints(vec![1, 2, 3], vec![3]).to_string(), "[1 2 3]");
        assert_eq!(ints(vec![1, 10, 100], vec![3]).to_string(), "[  1  10 100]");
    }

    #[test]
    fn test_display_floats_align_on_point() {
        let a = CpuArray::from_f64_vec(vec![1.0, 2.5, 10.0], vec![3]).unwrap();
        assert_eq!(a.to_string(), "[ 1.   2.5 10. ]");
    }

    #[test]
    fn test_display_2d_and_3d() {
        assert_eq!(
            ints((0..6).collect(), vec![2, 3]).to_string(),
            "[[0 1 2]\n [3 4 5]]"
        );
        assert_eq!(
            ints((0..8).collect(), vec![2, 2, 2]).to_string(),
            "[[[0 1]\n  [2 3]]\n\n [[4 5]\n  [6 7]]]"
        );
    }

    #[test]
    fn test_display_scalar_bool_text() {
        assert_eq!(CpuBackend::scalar(Scalar::Int(7)).to_string(), "7");
        let b = CpuArray::from_buffer(Buffer::Bool(vec![true, false]), vec![2]);
        assert_eq!(b.to_string(), "[ True False]");
        let o = CpuBackend::from_nested(Nested::from(vec!["a", "bc"])).unwrap();
        assert_eq!(o.dtype(), DType::Object);
        assert_eq!(o.to_string(), "[ 'a' 'bc']");
    }

    #[test]
    fn test_display_view_follows_strides() {
        let a = ints((0..6).collect(), vec![2, 3]);
        let t = a.view(vec![3, 2], vec![1, 3], 0);
        assert_eq!(t.to_string(), "[[0 3]\n [1 4]\n [2 5]]");
    }

    #[test]
    fn test_display_empty() {
        assert_eq!(ints(vec![], vec![2, 0]).to_string(), "[]");
    }

    #[test]
    fn test_summarised() {
        let a = ints((0..10).collect(), vec![10]);
        let options = PrintOptions::default().with_threshold(5).with_edge_items(2);
        let text = with_print_options(options, || a.to_string());
        assert_eq!(text, "[0 1 ... 8 9]");
        // restored afterwards
        assert_eq!(print_options(), PrintOptions::default());
        assert_eq!(a.to_string(), "[0 1 2 3 4 5 6 7 8 9]");
    }

    #[test]
    fn test_precision_and_separator() {
        let a = CpuArray::from_f64_vec(vec![0.123456, 1.5], vec![2]).unwrap();
        let options = PrintOptions::default()
            .with_precision(2)
            .with_separator(", ");
        let text = with_print_options(options, || a.to_string());
        assert_eq!(text, "[0.12, 1.5 ]");
    }
}
