//! 前景區塊切割
//!
//! 以 8 連通把前景遮罩切成互不相連的區塊，面積為像素數

use super::background_model::ForegroundMask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blob {
    pub area: u64,
    pub bounding_box: BoundingBox,
}

#[must_use]
pub fn find_blobs(mask: &ForegroundMask) -> Vec<Blob> {
    let width = mask.width as usize;
    let height = mask.height as usize;
    let mut visited = vec![false; mask.data.len()];
    let mut blobs = Vec::new();
    let mut stack = Vec::new();

    for start in 0..mask.data.len() {
        if !mask.data[start] || visited[start] {
            continue;
        }

        visited[start] = true;
        stack.push(start);

        let mut area = 0u64;
        let (mut min_x, mut min_y) = (usize::MAX, usize::MAX);
        let (mut max_x, mut max_y) = (0usize, 0usize);

        while let Some(index) = stack.pop() {
            let (x, y) = (index % width, index / width);
            area += 1;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);

            for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                    let neighbor = ny * width + nx;
                    if mask.data[neighbor] && !visited[neighbor] {
                        visited[neighbor] = true;
                        stack.push(neighbor);
                    }
                }
            }
        }

        blobs.push(Blob {
            area,
            bounding_box: BoundingBox {
                x: min_x as u32,
                y: min_y as u32,
                width: (max_x - min_x + 1) as u32,
                height: (max_y - min_y + 1) as u32,
            },
        });
    }

    blobs
}
