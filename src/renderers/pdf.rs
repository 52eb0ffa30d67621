//! PDF page writer
//!
//! Turns a `DisplayList` into PDF bytes with `pdf-writer`. Coordinates in
//! the list are millimetres from the top-left corner; PDF user space is
//! points from the bottom-left, so every `y` is flipped here.
//!
//! Content streams are left uncompressed; only image samples are deflated.

use std::io::Write;

use chrono::{Datelike, NaiveDateTime, Timelike};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::{Content, Date, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use super::display_list::{Color, DisplayList, DrawCommand, ImageId, TextAlign};
use super::text_metrics::{encode_winansi, text_width, PT_PER_MM};
use crate::models::RasterImage;

const FONT_NAME: Name<'static> = Name(b"F1");

/// Metadata written to the document information dictionary
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub producer: String,
    pub created: NaiveDateTime,
}

/// Sequential object ids
struct RefAlloc(i32);

impl RefAlloc {
    fn next(&mut self) -> Ref {
        self.0 += 1;
        Ref::new(self.0)
    }
}

struct EmbeddedImage {
    name: String,
    id: Ref,
}

/// Serialize the display list as a PDF document
pub fn write_pdf(list: &DisplayList, info: &DocumentInfo) -> Vec<u8> {
    let mut refs = RefAlloc(0);
    let catalog_id = refs.next();
    let tree_id = refs.next();
    let font_id = refs.next();
    let info_id = refs.next();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.type1_font(font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    let images: Vec<EmbeddedImage> = list
        .images
        .iter()
        .enumerate()
        .map(|(idx, raster)| {
            let id = write_image(&mut pdf, &mut refs, raster);
            EmbeddedImage {
                name: format!("Im{}", idx),
                id,
            }
        })
        .collect();

    let page_size = Rect::new(0.0, 0.0, list.page_width * PT_PER_MM, list.page_height * PT_PER_MM);
    let mut page_ids = Vec::with_capacity(list.pages.len());

    for render_page in &list.pages {
        let page_id = refs.next();
        let content_id = refs.next();
        page_ids.push(page_id);

        let mut painter = Painter::new(list.page_height, &images);
        for command in &render_page.commands {
            painter.draw(command);
        }
        pdf.stream(content_id, &painter.finish());

        let mut page = pdf.page(page_id);
        page.media_box(page_size);
        page.parent(tree_id);
        page.contents(content_id);

        let mut resources = page.resources();
        resources.fonts().pair(FONT_NAME, font_id);
        let used = render_page.image_ids();
        if !used.is_empty() {
            let mut x_objects = resources.x_objects();
            for ImageId(idx) in used {
                if let Some(image) = images.get(idx) {
                    x_objects.pair(Name(image.name.as_bytes()), image.id);
                }
            }
        }
    }

    let page_count = page_ids.len() as i32;
    pdf.pages(tree_id).kids(page_ids).count(page_count);

    let created = &info.created;
    pdf.document_info(info_id)
        .title(TextStr(&info.title))
        .producer(TextStr(&info.producer))
        .creation_date(
            Date::new(created.year().clamp(0, 9999) as u16)
                .month(created.month() as u8)
                .day(created.day() as u8)
                .hour(created.hour() as u8)
                .minute(created.minute() as u8)
                .second(created.second() as u8),
        );

    let bytes = pdf.finish();
    log::debug!(
        "Wrote PDF: {} page(s), {} image(s), {} bytes",
        list.page_count(),
        images.len(),
        bytes.len()
    );
    bytes
}

fn deflate(data: &[u8]) -> Option<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).ok()?;
    encoder.finish().ok()
}

/// Embed a raster, plus its soft mask; returns the image object id
fn write_image(pdf: &mut Pdf, refs: &mut RefAlloc, raster: &RasterImage) -> Ref {
    let image_id = refs.next();
    let mask_id = raster.alpha.as_ref().map(|alpha| {
        let mask_id = refs.next();
        write_samples(pdf, mask_id, raster, alpha, true, None);
        mask_id
    });
    write_samples(pdf, image_id, raster, &raster.rgb, false, mask_id);
    image_id
}

fn write_samples(
    pdf: &mut Pdf,
    id: Ref,
    raster: &RasterImage,
    samples: &[u8],
    gray: bool,
    mask: Option<Ref>,
) {
    let compressed = deflate(samples);
    let data = compressed.as_deref().unwrap_or(samples);

    let mut image = pdf.image_xobject(id, data);
    if compressed.is_some() {
        image.filter(Filter::FlateDecode);
    }
    image.width(raster.width as i32);
    image.height(raster.height as i32);
    if gray {
        image.color_space().device_gray();
    } else {
        image.color_space().device_rgb();
    }
    image.bits_per_component(8);
    if let Some(mask) = mask {
        image.s_mask(mask);
    }
    image.finish();
}

/// Emits content-stream operators for one page
struct Painter<'a> {
    content: Content,
    page_height: f32,
    images: &'a [EmbeddedImage],
}

impl<'a> Painter<'a> {
    fn new(page_height: f32, images: &'a [EmbeddedImage]) -> Self {
        Self {
            content: Content::new(),
            page_height,
            images,
        }
    }

    fn finish(self) -> Vec<u8> {
        self.content.finish()
    }

    fn px(x: f32) -> f32 {
        x * PT_PER_MM
    }

    fn py(&self, y: f32) -> f32 {
        (self.page_height - y) * PT_PER_MM
    }

    fn fill(&mut self, color: Color) {
        let [r, g, b] = color.unit();
        self.content.set_fill_rgb(r, g, b);
    }

    fn stroke(&mut self, color: Color, width: f32) {
        let [r, g, b] = color.unit();
        self.content.set_stroke_rgb(r, g, b);
        self.content.set_line_width(width * PT_PER_MM);
    }

    fn draw(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Text {
                x,
                y,
                text,
                size,
                color,
                align,
            } => {
                let x = match align {
                    TextAlign::Left => *x,
                    TextAlign::Center => x - text_width(text, *size) / 2.0,
                    TextAlign::Right => x - text_width(text, *size),
                };
                self.fill(*color);
                self.content.begin_text();
                self.content.set_font(FONT_NAME, *size);
                self.content.next_line(Self::px(x), self.py(*y));
                self.content.show(Str(&encode_winansi(text)));
                self.content.end_text();
            }

            DrawCommand::TextBlock {
                x,
                y,
                lines,
                size,
                line_height,
                color,
            } => {
                if lines.is_empty() {
                    return;
                }
                self.fill(*color);
                self.content.begin_text();
                self.content.set_font(FONT_NAME, *size);
                self.content.next_line(Self::px(*x), self.py(*y));
                for (idx, line) in lines.iter().enumerate() {
                    if idx > 0 {
                        self.content.next_line(0.0, -line_height * PT_PER_MM);
                    }
                    self.content.show(Str(&encode_winansi(line)));
                }
                self.content.end_text();
            }

            DrawCommand::Rule {
                x1,
                y1,
                x2,
                y2,
                line_width,
                color,
            } => {
                self.stroke(*color, *line_width);
                self.content.move_to(Self::px(*x1), self.py(*y1));
                self.content.line_to(Self::px(*x2), self.py(*y2));
                self.content.stroke();
            }

            DrawCommand::Rect {
                x,
                y,
                width,
                height,
                line_width,
                color,
            } => {
                self.stroke(*color, *line_width);
                self.content.rect(
                    Self::px(*x),
                    self.py(y + height),
                    width * PT_PER_MM,
                    height * PT_PER_MM,
                );
                self.content.stroke();
            }

            DrawCommand::Image {
                image,
                x,
                y,
                width,
                height,
            } => {
                let Some(embedded) = self.images.get(image.0) else {
                    log::warn!("Display list references missing image {}", image.0);
                    return;
                };
                let matrix = [
                    width * PT_PER_MM,
                    0.0,
                    0.0,
                    height * PT_PER_MM,
                    Self::px(*x),
                    self.py(y + height),
                ];
                self.content.save_state();
                self.content.transform(matrix);
                self.content.x_object(Name(embedded.name.as_bytes()));
                self.content.restore_state();
            }

            DrawCommand::CheckMark { x, y, size, color } => {
                // Glyph box is roughly 0.75 em high, sitting on the baseline
                let em = size / PT_PER_MM;
                self.stroke(*color, em * 0.12);
                self.content.move_to(Self::px(*x), self.py(y - em * 0.35));
                self.content.line_to(Self::px(x + em * 0.25), self.py(*y));
                self.content.line_to(Self::px(x + em * 0.7), self.py(y - em * 0.75));
                self.content.stroke();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::display_list::RenderPage;
    use chrono::NaiveDate;

    fn info() -> DocumentInfo {
        DocumentInfo {
            title: "Test".into(),
            producer: "epi-forms".into(),
            created: NaiveDate::from_ymd_opt(2026, 10, 18)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        }
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|window| window == needle)
    }

    fn page_with_text(text: &str) -> RenderPage {
        let mut page = RenderPage::default();
        page.push(DrawCommand::Text {
            x: 105.0,
            y: 20.0,
            text: text.into(),
            size: 16.0,
            color: Color::BLACK,
            align: TextAlign::Center,
        });
        page
    }

    #[test]
    fn test_writes_pages_and_font() {
        let mut list = DisplayList::new();
        list.push_page(page_with_text("HELLO"));
        list.push_page(page_with_text("WORLD"));

        let bytes = write_pdf(&list, &info());
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, b"/Helvetica"));
        assert!(contains(&bytes, b"/WinAnsiEncoding"));
        assert!(contains(&bytes, b"/Count 2"));
        assert!(contains(&bytes, b"(HELLO)"));
        assert!(contains(&bytes, b"(WORLD)"));
        assert!(contains(&bytes, b"D:20261018093000"));
    }

    #[test]
    fn test_same_input_same_bytes() {
        let mut list = DisplayList::new();
        list.push_page(page_with_text("Same"));
        assert_eq!(write_pdf(&list, &info()), write_pdf(&list, &info()));
    }

    #[test]
    fn test_image_with_alpha_gets_soft_mask() {
        let mut list = DisplayList::new();
        let id = list.add_image(RasterImage {
            width: 2,
            height: 1,
            rgb: vec![0, 0, 0, 255, 255, 255],
            alpha: Some(vec![255, 0]),
        });
        let mut page = RenderPage::default();
        page.push(DrawCommand::Image {
            image: id,
            x: 10.0,
            y: 10.0,
            width: 20.0,
            height: 10.0,
        });
        list.push_page(page);

        let bytes = write_pdf(&list, &info());
        assert!(contains(&bytes, b"/SMask"));
        assert!(contains(&bytes, b"/DeviceGray"));
        assert!(contains(&bytes, b"/FlateDecode"));
        assert!(contains(&bytes, b"/Im0 Do"));
    }

    #[test]
    fn test_unused_image_not_in_page_resources() {
        let mut list = DisplayList::new();
        list.add_image(RasterImage {
            width: 1,
            height: 1,
            rgb: vec![0, 0, 0],
            alpha: None,
        });
        list.push_page(page_with_text("x"));

        let bytes = write_pdf(&list, &info());
        assert!(!contains(&bytes, b"/Im0"));
        assert!(!contains(&bytes, b"/SMask"));
    }
}
