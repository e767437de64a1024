//! GDI painting of the shell window.
//!
//! Everything is drawn into a memory DC and blitted in one go. When the
//! acrylic backdrop is active the background is left black so the blur shows
//! through.

use windows::core::w;
use windows::Win32::Foundation::{COLORREF, RECT, SIZE};
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, CreateFontW, CreatePen, CreateSolidBrush,
    DeleteDC, DeleteObject, DrawTextW, Ellipse, FillRect, GetStockObject, GetTextExtentPoint32W,
    LineTo, MoveToEx, RoundRect, SelectObject, SetBkMode, SetTextColor, CLEARTYPE_QUALITY,
    CLIP_DEFAULT_PRECIS, DEFAULT_CHARSET, DRAW_TEXT_FORMAT, DT_CENTER, DT_END_ELLIPSIS, DT_LEFT,
    DT_SINGLELINE, DT_VCENTER, HDC, HFONT, HGDIOBJ, NULL_BRUSH, NULL_PEN, OUT_DEFAULT_PRECIS,
    PS_SOLID, SRCCOPY, TRANSPARENT,
};

use crate::driver::WindowEffects;
use crate::model::layout::*;
use crate::model::theme::{CLOSE_GLYPH, TEXT_MUTED, TEXT_PRIMARY};
use crate::model::{
    Rgba, ShellState, ACRYLIC_TINT, SET_POINT_KEY_LABEL, TOGGLE_KEY_LABEL, WINDOW_HEIGHT,
    WINDOW_WIDTH,
};

const FONT_FACE: windows::core::PCWSTR = w!("Segoe UI");
const WEIGHT_REGULAR: i32 = 400;
const WEIGHT_SEMIBOLD: i32 = 600;
const WEIGHT_BOLD: i32 = 700;

const CARD_FILL: Rgba = Rgba::rgba(255, 255, 255, 18);
const SWITCH_OFF: Rgba = Rgba::rgb(70, 80, 92);

fn wide(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

fn colorref(color: Rgba) -> COLORREF {
    COLORREF(color.to_colorref())
}

fn to_rect(rect: Rect) -> RECT {
    RECT {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

struct Fonts {
    title: HFONT,
    body: HFONT,
    small: HFONT,
    key: HFONT,
}

impl Fonts {
    fn create() -> Self {
        Self {
            title: font(40, WEIGHT_BOLD),
            body: font(17, WEIGHT_SEMIBOLD),
            small: font(14, WEIGHT_REGULAR),
            key: font(24, WEIGHT_BOLD),
        }
    }
}

impl Drop for Fonts {
    fn drop(&mut self) {
        unsafe {
            for font in [self.title, self.body, self.small, self.key] {
                let _ = DeleteObject(font.into());
            }
        }
    }
}

fn font(height: i32, weight: i32) -> HFONT {
    unsafe {
        CreateFontW(
            -height,
            0,
            0,
            0,
            weight,
            0,
            0,
            0,
            DEFAULT_CHARSET,
            OUT_DEFAULT_PRECIS,
            CLIP_DEFAULT_PRECIS,
            CLEARTYPE_QUALITY,
            0,
            FONT_FACE,
        )
    }
}

/// Thin drawing helpers over a device context.
struct Canvas {
    hdc: HDC,
}

impl Canvas {
    fn fill(&self, rect: Rect, color: Rgba) {
        unsafe {
            let brush = CreateSolidBrush(colorref(color));
            FillRect(self.hdc, &to_rect(rect), brush);
            let _ = DeleteObject(brush.into());
        }
    }

    /// Rounded rectangle with an optional fill and an optional 1 px outline.
    fn round_rect(&self, rect: Rect, radius: i32, fill: Option<Rgba>, outline: Option<Rgba>) {
        unsafe {
            let brush = fill.map(|c| CreateSolidBrush(colorref(c)));
            let pen = outline.map(|c| CreatePen(PS_SOLID, 1, colorref(c)));

            let brush_obj: HGDIOBJ = match brush {
                Some(b) => b.into(),
                None => GetStockObject(NULL_BRUSH),
            };
            let pen_obj: HGDIOBJ = match pen {
                Some(p) => p.into(),
                None => GetStockObject(NULL_PEN),
            };
            let old_brush = SelectObject(self.hdc, brush_obj);
            let old_pen = SelectObject(self.hdc, pen_obj);
            let _ = RoundRect(
                self.hdc,
                rect.left,
                rect.top,
                rect.right,
                rect.bottom,
                radius * 2,
                radius * 2,
            );
            SelectObject(self.hdc, old_pen);
            SelectObject(self.hdc, old_brush);

            if let Some(b) = brush {
                let _ = DeleteObject(b.into());
            }
            if let Some(p) = pen {
                let _ = DeleteObject(p.into());
            }
        }
    }

    fn ellipse(&self, rect: Rect, fill: Option<Rgba>, outline: Option<(Rgba, i32)>) {
        unsafe {
            let brush = fill.map(|c| CreateSolidBrush(colorref(c)));
            let pen = outline.map(|(c, width)| CreatePen(PS_SOLID, width, colorref(c)));
            let old_brush = SelectObject(
                self.hdc,
                brush.map_or_else(|| GetStockObject(NULL_BRUSH), Into::into),
            );
            let old_pen = SelectObject(
                self.hdc,
                pen.map_or_else(|| GetStockObject(NULL_PEN), Into::into),
            );
            let _ = Ellipse(self.hdc, rect.left, rect.top, rect.right, rect.bottom);
            SelectObject(self.hdc, old_pen);
            SelectObject(self.hdc, old_brush);
            if let Some(b) = brush {
                let _ = DeleteObject(b.into());
            }
            if let Some(p) = pen {
                let _ = DeleteObject(p.into());
            }
        }
    }

    fn line(&self, from: (i32, i32), to: (i32, i32), color: Rgba, width: i32) {
        unsafe {
            let pen = CreatePen(PS_SOLID, width, colorref(color));
            let old = SelectObject(self.hdc, pen.into());
            let _ = MoveToEx(self.hdc, from.0, from.1, None);
            let _ = LineTo(self.hdc, to.0, to.1);
            SelectObject(self.hdc, old);
            let _ = DeleteObject(pen.into());
        }
    }

    fn text(&self, rect: Rect, text: &str, color: Rgba, font: HFONT, format: DRAW_TEXT_FORMAT) {
        unsafe {
            let old = SelectObject(self.hdc, font.into());
            SetTextColor(self.hdc, colorref(color));
            let mut buf = wide(text);
            let mut r = to_rect(rect);
            DrawTextW(self.hdc, &mut buf, &mut r, format | DT_SINGLELINE | DT_VCENTER);
            SelectObject(self.hdc, old);
        }
    }

    /// Centred text with a per-character colour ramp.
    fn gradient_text(&self, rect: Rect, text: &str, from: Rgba, to: Rgba, font: HFONT) {
        unsafe {
            let old = SelectObject(self.hdc, font.into());
            let glyphs: Vec<(Vec<u16>, i32)> = text
                .chars()
                .map(|c| {
                    let mut buf = [0u16; 2];
                    let units = c.encode_utf16(&mut buf).to_vec();
                    let mut size = SIZE::default();
                    let _ = GetTextExtentPoint32W(self.hdc, &units, &mut size);
                    (units, size.cx)
                })
                .collect();
            let total: i32 = glyphs.iter().map(|(_, w)| w).sum();
            let steps = glyphs.len().saturating_sub(1).max(1) as f32;

            let mut x = rect.left + (rect.width() - total) / 2;
            for (i, (mut units, width)) in glyphs.into_iter().enumerate() {
                SetTextColor(self.hdc, colorref(from.lerp(to, i as f32 / steps)));
                let mut r = RECT {
                    left: x,
                    top: rect.top,
                    right: x + width,
                    bottom: rect.bottom,
                };
                DrawTextW(self.hdc, &mut units, &mut r, DT_LEFT | DT_SINGLELINE | DT_VCENTER);
                x += width;
            }
            SelectObject(self.hdc, old);
        }
    }
}

/// Paint the whole client area from the view model.
pub fn paint(hdc: HDC, view: &ShellState, effects: WindowEffects) {
    unsafe {
        let mem = CreateCompatibleDC(Some(hdc));
        let bitmap = CreateCompatibleBitmap(hdc, WINDOW_WIDTH, WINDOW_HEIGHT);
        let old_bitmap = SelectObject(mem, bitmap.into());
        SetBkMode(mem, TRANSPARENT);

        draw(&Canvas { hdc: mem }, view, effects);

        let _ = BitBlt(
            hdc,
            0,
            0,
            WINDOW_WIDTH,
            WINDOW_HEIGHT,
            Some(mem),
            0,
            0,
            SRCCOPY,
        );
        SelectObject(mem, old_bitmap);
        let _ = DeleteObject(bitmap.into());
        let _ = DeleteDC(mem);
    }
}

fn draw(canvas: &Canvas, view: &ShellState, effects: WindowEffects) {
    let palette = view.palette();
    let fonts = Fonts::create();
    let window = Rect::new(0, 0, WINDOW_WIDTH, WINDOW_HEIGHT);

    let background = if effects.translucent {
        Rgba::rgb(0, 0, 0)
    } else {
        palette.background.over(ACRYLIC_TINT)
    };
    canvas.fill(window, background);
    let card = CARD_FILL.over(background);

    // Header
    canvas.text(CLOSE_BUTTON, "\u{00D7}", CLOSE_GLYPH, fonts.key, DT_CENTER);
    canvas.round_rect(STATUS_BADGE, STATUS_BADGE.height() / 2, Some(card), Some(palette.badge));
    let dot_y = STATUS_BADGE.top + STATUS_BADGE.height() / 2;
    let dot_x = STATUS_BADGE.left + 16;
    canvas.ellipse(
        Rect::new(dot_x - 4, dot_y - 4, dot_x + 4, dot_y + 4),
        Some(palette.badge),
        None,
    );
    canvas.text(
        Rect::new(dot_x + 10, STATUS_BADGE.top, STATUS_BADGE.right - 10, STATUS_BADGE.bottom),
        &view.badge_text,
        TEXT_PRIMARY,
        fonts.small,
        DT_LEFT | DT_END_ELLIPSIS,
    );

    // Crosshair logo
    let (cx, cy) = (
        LOGO.left + LOGO.width() / 2,
        LOGO.top + LOGO.height() / 2,
    );
    canvas.ellipse(LOGO, None, Some((palette.accent.0, 3)));
    canvas.ellipse(
        Rect::new(cx - 8, cy - 8, cx + 8, cy + 8),
        Some(palette.accent.1),
        None,
    );
    canvas.line((cx, LOGO.top - 8), (cx, LOGO.top + 16), palette.accent.0, 3);
    canvas.line((cx, LOGO.bottom - 16), (cx, LOGO.bottom + 8), palette.accent.0, 3);
    canvas.line((LOGO.left - 8, cy), (LOGO.left + 16, cy), palette.accent.0, 3);
    canvas.line((LOGO.right - 16, cy), (LOGO.right + 8, cy), palette.accent.0, 3);

    canvas.gradient_text(TITLE, "RoFreeze", palette.accent.0, palette.accent.1, fonts.title);
    canvas.text(
        Rect::new(TITLE.left, TITLE.bottom, TITLE.right, TITLE.bottom + 26),
        "Lock your cursor in place",
        TEXT_MUTED.over(background),
        fonts.small,
        DT_CENTER,
    );

    // Primary button
    canvas.round_rect(START_BUTTON, 14, Some(palette.accent.0), None);
    canvas.text(
        START_BUTTON,
        view.button_label(),
        TEXT_PRIMARY,
        fonts.body,
        DT_CENTER,
    );

    // First person card
    canvas.round_rect(FIRST_PERSON_CARD, 12, Some(card), None);
    canvas.text(
        Rect::new(
            FIRST_PERSON_CARD.left + 16,
            FIRST_PERSON_CARD.top,
            FIRST_PERSON_SWITCH.left - 8,
            FIRST_PERSON_CARD.bottom,
        ),
        "First Person / Mouse Lock",
        TEXT_PRIMARY,
        fonts.small,
        DT_LEFT,
    );
    let track = if view.first_person_mode {
        palette.accent.1
    } else {
        SWITCH_OFF
    };
    canvas.round_rect(
        FIRST_PERSON_SWITCH,
        FIRST_PERSON_SWITCH.height() / 2,
        Some(track),
        None,
    );
    let knob = FIRST_PERSON_SWITCH.height() - 6;
    let knob_left = if view.first_person_mode {
        FIRST_PERSON_SWITCH.right - 3 - knob
    } else {
        FIRST_PERSON_SWITCH.left + 3
    };
    canvas.ellipse(
        Rect::new(
            knob_left,
            FIRST_PERSON_SWITCH.top + 3,
            knob_left + knob,
            FIRST_PERSON_SWITCH.top + 3 + knob,
        ),
        Some(TEXT_PRIMARY),
        None,
    );

    // Key hints
    for (rect, key, caption) in [
        (SET_POINT_HINT, SET_POINT_KEY_LABEL, "Set Point"),
        (TOGGLE_HINT, TOGGLE_KEY_LABEL, "Toggle"),
    ] {
        canvas.round_rect(rect, 12, Some(card), None);
        let split = rect.top + rect.height() / 2 + 4;
        canvas.text(
            Rect::new(rect.left, rect.top + 6, rect.right, split),
            key,
            palette.accent.1,
            fonts.key,
            DT_CENTER,
        );
        canvas.text(
            Rect::new(rect.left, split, rect.right, rect.bottom - 6),
            caption,
            TEXT_MUTED.over(card),
            fonts.small,
            DT_CENTER,
        );
    }
}
