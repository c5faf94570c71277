// ABOUTME: Draws slider pages at their animated positions
// Pages are rendered off-screen and blitted, so partially visible pages clip cleanly

use ratatui::{buffer::Buffer, layout::Rect};

use crate::slider::{Page, PageId, SliderController};

pub struct SliderView;

impl SliderView {
    /// Render every page that overlaps `area`; `render_page` draws one page into a scratch buffer
    pub fn render<C, F>(slider: &SliderController<C>, area: Rect, buf: &mut Buffer, mut render_page: F)
    where
        F: FnMut(PageId, &Page<C>, Rect, &mut Buffer),
    {
        for (id, page) in slider.iter() {
            let Some(target) = Self::page_rect(page, area) else {
                continue;
            };

            let local = Rect::new(0, 0, page.size().width, page.size().height);
            let mut scratch = Buffer::empty(local);
            render_page(id, page, local, &mut scratch);

            let origin_x = i32::from(area.x) + page.position().x;
            let origin_y = i32::from(area.y) + page.position().y;
            for y in target.top()..target.bottom() {
                for x in target.left()..target.right() {
                    let src_x = (i32::from(x) - origin_x) as u16;
                    let src_y = (i32::from(y) - origin_y) as u16;
                    *buf.get_mut(x, y) = scratch.get(src_x, src_y).clone();
                }
            }
        }
    }

    /// Part of `area` covered by the page, `None` when it is entirely off-screen
    pub fn page_rect<C>(page: &Page<C>, area: Rect) -> Option<Rect> {
        let size = page.size();
        if size.width == 0 || size.height == 0 {
            return None;
        }

        let left = i32::from(area.x) + page.position().x;
        let top = i32::from(area.y) + page.position().y;
        let right = left + i32::from(size.width);
        let bottom = top + i32::from(size.height);

        let clip_left = left.max(i32::from(area.left()));
        let clip_top = top.max(i32::from(area.top()));
        let clip_right = right.min(i32::from(area.right()));
        let clip_bottom = bottom.min(i32::from(area.bottom()));

        if clip_left >= clip_right || clip_top >= clip_bottom {
            return None;
        }

        Some(Rect::new(
            clip_left as u16,
            clip_top as u16,
            (clip_right - clip_left) as u16,
            (clip_bottom - clip_top) as u16,
        ))
    }
}
