//! XLSX styles (styles.xml) for export sheets
//!
//! Export sheets use exactly two cell formats: the default body format and a
//! bold header format on a light lavender fill.

/// cellXfs index of the body format
pub(crate) const BODY_STYLE: u32 = 0;

/// cellXfs index of the header format
pub(crate) const HEADER_STYLE: u32 = 1;

/// Header fill colour (ARGB)
const HEADER_FILL_ARGB: &str = "FFE6E6FA";

#[derive(Debug, Clone, PartialEq)]
struct FontSpec {
    name: &'static str,
    size: f64,
    bold: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum FillSpec {
    None,
    Gray125,
    Solid { argb: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct XfSpec {
    font_id: u32,
    fill_id: u32,
    border_id: u32,
}

/// The fixed stylesheet written into every export
#[derive(Debug)]
pub(crate) struct ExportStyles {
    fonts: Vec<FontSpec>,
    fills: Vec<FillSpec>,
    cell_xfs: Vec<XfSpec>,
}

impl ExportStyles {
    pub(crate) fn new() -> Self {
        let regular = FontSpec {
            name: "Calibri",
            size: 11.0,
            bold: false,
        };
        let bold = FontSpec {
            bold: true,
            ..regular.clone()
        };

        Self {
            fonts: vec![regular, bold],
            // Excel requires the first two fills to be: none and gray125
            fills: vec![
                FillSpec::None,
                FillSpec::Gray125,
                FillSpec::Solid {
                    argb: HEADER_FILL_ARGB,
                },
            ],
            cell_xfs: vec![
                // BODY_STYLE
                XfSpec {
                    font_id: 0,
                    fill_id: 0,
                    border_id: 0,
                },
                // HEADER_STYLE
                XfSpec {
                    font_id: 1,
                    fill_id: 2,
                    border_id: 0,
                },
            ],
        }
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        // Fonts
        xml.push_str(&format!("\n  <fonts count=\"{}\">", self.fonts.len()));
        for font in &self.fonts {
            xml.push_str("\n    ");
            xml.push_str(&write_font(font));
        }
        xml.push_str("\n  </fonts>");

        // Fills
        xml.push_str(&format!("\n  <fills count=\"{}\">", self.fills.len()));
        for fill in &self.fills {
            xml.push_str("\n    ");
            xml.push_str(&write_fill(fill));
        }
        xml.push_str("\n  </fills>");

        // Borders
        xml.push_str(
            r#"
  <borders count="1">
    <border><left/><right/><top/><bottom/><diagonal/></border>
  </borders>"#,
        );

        // cellStyleXfs (required)
        xml.push_str(
            r#"
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
        );

        // cellXfs
        xml.push_str(&format!("\n  <cellXfs count=\"{}\">", self.cell_xfs.len()));
        for xf in &self.cell_xfs {
            xml.push_str("\n    ");
            xml.push_str(&write_xf(*xf));
        }
        xml.push_str("\n  </cellXfs>");

        // cellStyles (required)
        xml.push_str(
            r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>"#,
        );

        xml.push_str("\n</styleSheet>");
        xml
    }
}

fn write_font(font: &FontSpec) -> String {
    let mut s = String::from("<font>");
    if font.bold {
        s.push_str("<b/>");
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    s.push_str(&format!("<name val=\"{}\"/>", font.name));
    s.push_str("</font>");
    s
}

fn write_fill(fill: &FillSpec) -> String {
    match fill {
        FillSpec::None => "<fill><patternFill patternType=\"none\"/></fill>".to_string(),
        FillSpec::Gray125 => "<fill><patternFill patternType=\"gray125\"/></fill>".to_string(),
        FillSpec::Solid { argb } => format!(
            "<fill><patternFill patternType=\"solid\"><fgColor rgb=\"{}\"/></patternFill></fill>",
            argb
        ),
    }
}

fn write_xf(xf: XfSpec) -> String {
    let mut s = format!(
        "<xf numFmtId=\"0\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"",
        xf.font_id, xf.fill_id, xf.border_id
    );
    if xf.font_id != 0 {
        s.push_str(" applyFont=\"1\"");
    }
    if xf.fill_id != 0 {
        s.push_str(" applyFill=\"1\"");
    }
    s.push_str("/>");
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_cell_formats() {
        let styles = ExportStyles::new();
        assert_eq!(styles.cell_xfs.len(), 2);
        assert_eq!(BODY_STYLE, 0);
        assert_eq!(HEADER_STYLE, 1);
    }

    #[test]
    fn test_styles_xml_content() {
        let xml = ExportStyles::new().to_styles_xml();

        assert!(xml.contains(r#"<fonts count="2">"#));
        assert!(xml.contains(r#"<font><sz val="11"/><name val="Calibri"/></font>"#));
        assert!(xml.contains(r#"<font><b/><sz val="11"/><name val="Calibri"/></font>"#));

        assert!(xml.contains(r#"<fills count="3">"#));
        assert!(xml.contains(r#"<patternFill patternType="gray125"/>"#));
        assert!(xml.contains(r#"<fgColor rgb="FFE6E6FA"/>"#));

        assert!(xml.contains(r#"<cellXfs count="2">"#));
        assert!(xml.contains(
            r#"<xf numFmtId="0" fontId="1" fillId="2" borderId="0" xfId="0" applyFont="1" applyFill="1"/>"#
        ));
        assert!(xml.contains(r#"<cellStyle name="Normal" xfId="0" builtinId="0"/>"#));
    }

    #[test]
    fn test_styles_xml_is_well_formed() {
        let xml = ExportStyles::new().to_styles_xml();
        let mut reader = quick_xml::Reader::from_str(&xml);
        loop {
            match reader.read_event() {
                Ok(quick_xml::events::Event::Eof) => break,
                Ok(_) => {}
                Err(e) => panic!("styles.xml is not well formed: {}", e),
            }
        }
    }
}
