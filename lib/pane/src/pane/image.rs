//! Image panes. An image is embedded in a `Div` as a base64 data URI. Images are taken from the
//! object's own encoding of the format, from a file with the format's extension or from an
//! HTTP(S) URL with the format's extension. Raster images are sized by reading their header.

use crate::prelude::*;

use crate::config::Config;
use crate::document::Properties;
use crate::error::RenderError;
use crate::pane::Pane;
use crate::pane::PaneType;
use crate::pane::Renderer;
use crate::pane::div;
use crate::pane::div::DivContent;
use crate::pane::div::DivRenderer;
use crate::value::Value;

use base64::Engine;
use std::path::Path;



/// Rank of the image panes.
pub const PRIORITY : f64 = 0.5;



// ===================
// === ImageFormat ===
// ===================

/// Supported image formats.
#[derive(Clone,Copy,Debug,Display,Eq,Hash,PartialEq)]
#[allow(missing_docs)]
pub enum ImageFormat {
    #[display(fmt = "PNG")] Png,
    #[display(fmt = "GIF")] Gif,
    #[display(fmt = "JPG")] Jpg,
    #[display(fmt = "SVG")] Svg,
}

impl ImageFormat {
    /// All formats, in registration order.
    pub const ALL : [ImageFormat;4] = [ImageFormat::Png,ImageFormat::Gif,ImageFormat::Jpg,ImageFormat::Svg];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Svg => "svg",
        }
    }

    /// Media type used in data URIs.
    pub fn mime(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Jpg => "image/jpg",
            ImageFormat::Svg => "image/svg+xml",
        }
    }

    /// Checks whether the data starts the way files of this format do.
    pub fn matches_signature(self, data:&[u8]) -> bool {
        match self {
            ImageFormat::Png => data.starts_with(b"\x89PNG\r\n\x1a\n"),
            ImageFormat::Gif => data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a"),
            ImageFormat::Jpg => data.starts_with(&[0xFF,0xD8]),
            ImageFormat::Svg => std::str::from_utf8(data).map(is_svg_markup).unwrap_or(false),
        }
    }

    /// Width and height of a raster image, read from its header. SVG images have no intrinsic
    /// shape and are sized by the configuration.
    pub fn shape(self, data:&[u8]) -> Result<(u32,u32)> {
        match self {
            ImageFormat::Png => png_shape(data),
            ImageFormat::Gif => gif_shape(data),
            ImageFormat::Jpg => jpeg_shape(data),
            ImageFormat::Svg => Err(malformed(self,"SVG images carry no pixel shape")),
        }
    }
}

fn is_svg_markup(text:&str) -> bool {
    text.trim_start().starts_with("<svg")
}

fn malformed(format:ImageFormat, reason:impl Into<String>) -> Error {
    let format = format.to_string();
    let reason = reason.into();
    RenderError::MalformedImage {format,reason}.into()
}



// =============
// === Shape ===
// =============

fn be_u16(data:&[u8], at:usize) -> Option<u16> {
    data.get(at..at+2).map(|b| u16::from_be_bytes([b[0],b[1]]))
}

fn be_u32(data:&[u8], at:usize) -> Option<u32> {
    data.get(at..at+4).map(|b| u32::from_be_bytes([b[0],b[1],b[2],b[3]]))
}

fn le_u16(data:&[u8], at:usize) -> Option<u16> {
    data.get(at..at+2).map(|b| u16::from_le_bytes([b[0],b[1]]))
}

/// Shape of a PNG image: big-endian width and height at offset 16.
pub fn png_shape(data:&[u8]) -> Result<(u32,u32)> {
    let shape = be_u32(data,16).zip(be_u32(data,20));
    shape.ok_or_else(|| malformed(ImageFormat::Png,"header is truncated"))
}

/// Shape of a GIF image: little-endian width and height at offset 6.
pub fn gif_shape(data:&[u8]) -> Result<(u32,u32)> {
    let shape = le_u16(data,6).zip(le_u16(data,8));
    let shape = shape.map(|(w,h)| (w as u32,h as u32));
    shape.ok_or_else(|| malformed(ImageFormat::Gif,"header is truncated"))
}

/// Shape of a JPEG image, read from the first start-of-frame segment.
///
/// Marker segments are skipped until a baseline or progressive frame header (`0xC0` to `0xC3`),
/// whose height and width follow the segment length and the sample precision. Scanning stops at
/// the start of the scan data (`0xDA`).
pub fn jpeg_shape(data:&[u8]) -> Result<(u32,u32)> {
    const START_OF_SCAN : u8 = 0xDA;
    let truncated = || malformed(ImageFormat::Jpg,"no frame header before the end of the data");
    let mut pos   = 2;
    let next      = |pos:&mut usize| {
        let byte = data.get(*pos).copied();
        *pos += 1;
        byte
    };
    let mut marker = next(&mut pos).ok_or_else(truncated)?;
    while marker != START_OF_SCAN {
        while marker != 0xFF { marker = next(&mut pos).ok_or_else(truncated)?; }
        while marker == 0xFF { marker = next(&mut pos).ok_or_else(truncated)?; }
        if marker == START_OF_SCAN {
            break
        }
        if (0xC0..=0xC3).contains(&marker) {
            let height = be_u16(data,pos+3).ok_or_else(truncated)?;
            let width  = be_u16(data,pos+5).ok_or_else(truncated)?;
            return Ok((width as u32,height as u32))
        }
        let length = be_u16(data,pos).ok_or_else(truncated)? as usize;
        if length < 2 {
            return Err(malformed(ImageFormat::Jpg,format!("segment length {} is invalid",length)))
        }
        pos    += length;
        marker  = next(&mut pos).ok_or_else(truncated)?;
    }
    Err(malformed(ImageFormat::Jpg,"no frame header before the scan data"))
}

/// Scales the intrinsic shape to the configured size. When only one of width and height is
/// configured the other one keeps the aspect ratio.
pub fn scale(format:ImageFormat, shape:(u32,u32), config:&Config) -> Result<(u32,u32)> {
    let (width,height) = shape;
    let scaled = |target:u32, from:u32, other:u32| {
        if from == 0 { Err(malformed(format,"image has a zero dimension")) }
        else         { Ok((target as f64 / from as f64 * other as f64) as u32) }
    };
    match (config.width,config.height) {
        (Some(w),Some(h)) => Ok((w,h)),
        (Some(w),None)    => Ok((w,scaled(w,width,height)?)),
        (None,Some(h))    => Ok((scaled(h,height,width)?,h)),
        (None,None)       => Ok((width,height)),
    }
}



// ==============
// === Source ===
// ==============

/// Where the bytes of an image come from.
#[derive(Clone,Debug,PartialEq)]
pub enum Source {
    /// Encoded by the object itself.
    Object,
    /// Literal SVG markup.
    Markup(String),
    /// A local file.
    File(String),
    /// An HTTP(S) URL.
    Url(String),
}

impl Source {
    /// Finds the source of an image of the given format in the value.
    pub fn find(value:&Value, format:ImageFormat) -> Option<Self> {
        if value.has_image(format) {
            return Some(Source::Object)
        }
        let text = value.as_str()?;
        if format == ImageFormat::Svg && is_svg_markup(text) {
            return Some(Source::Markup(text.into()))
        }
        if !text.ends_with(&format!(".{}",format.extension())) {
            return None
        }
        if Path::new(text).is_file() {
            Some(Source::File(text.into()))
        } else if text.starts_with("http://") || text.starts_with("https://") {
            Some(Source::Url(text.into()))
        } else {
            None
        }
    }

    /// Loads the encoded image.
    pub fn load(&self, value:&Value, format:ImageFormat) -> Result<Vec<u8>> {
        let unreachable = |source:&str, reason:String| {
            let source = source.into();
            Error::from(RenderError::Unreachable {source,reason})
        };
        match self {
            Source::Object       => value.repr_image(format).ok_or_else(|| {
                malformed(format,format!("{} did not produce an image",value.type_name()))
            }),
            Source::Markup(text) => Ok(text.clone().into_bytes()),
            Source::File(path)   => std::fs::read(path).map_err(|e| unreachable(path,e.to_string())),
            Source::Url(url)     => fetch(url).map_err(|e| unreachable(url,e.to_string())),
        }
    }
}

fn fetch(url:&str) -> reqwest::Result<Vec<u8>> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}



// ====================
// === ImageContent ===
// ====================

/// Builds the `<img>` tag embedding the data. Unset sizes are left out of the tag.
pub fn img_tag(mime:&str, data:&[u8], width:Option<u32>, height:Option<u32>) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    let size    = [("width",width),("height",height)].iter().filter_map(|&(name,size)| {
        size.map(|size| format!(" {}={}",name,size))
    }).collect::<String>();
    format!("<img src='data:{};base64,{}'{}></img>",mime,encoded,size)
}

/// Properties of a `Div` embedding an image of the given intrinsic shape.
pub fn image_properties
(pane:&Pane, format:ImageFormat, data:&[u8], shape:(u32,u32)) -> Result<Properties> {
    let (width,height) = scale(format,shape,pane.config())?;
    let mut properties = div::with_text(pane,img_tag(format.mime(),data,Some(width),Some(height)));
    properties.insert("width".into(),width.into());
    properties.insert("height".into(),height.into());
    Ok(properties)
}

#[derive(Clone,Copy,Debug)]
struct ImageContent {
    format : ImageFormat,
}

impl ImageContent {
    fn svg_properties(&self, pane:&Pane, data:&[u8]) -> Properties {
        let config = pane.config();
        let tag    = img_tag(self.format.mime(),data,config.width,config.height);
        div::with_text(pane,tag)
    }
}

impl DivContent for ImageContent {
    fn properties(&self, pane:&Pane) -> Result<Properties> {
        let value  = pane.value()?;
        let source = Source::find(&value,self.format).ok_or_else(|| {
            let reason = format!("{} is not a {} source",value.type_name(),self.format);
            malformed(self.format,reason)
        })?;
        let data = source.load(&value,self.format)?;
        match self.format {
            ImageFormat::Svg => Ok(self.svg_properties(pane,&data)),
            format           => image_properties(pane,format,&data,format.shape(&data)?),
        }
    }
}

/// Checks whether the value is an image of the given format.
pub fn applies(value:&Value, format:ImageFormat) -> bool {
    Source::find(value,format).is_some()
}

/// The pane type of images of the given format.
pub fn pane_type(format:ImageFormat) -> PaneType {
    let name      = format.to_string();
    let predicate = move |value:&Value| applies(value,format);
    let factory   = move |_:&Config| {
        Ok(Box::new(DivRenderer::new(ImageContent {format})) as Box<dyn Renderer>)
    };
    PaneType::new(name.clone(),name,PRIORITY,predicate,factory)
}



// =============
// === Tests ===
// =============

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width:u32, height:u32) -> Vec<u8> {
        let mut data = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[8,6,0,0,0]);
        data
    }

    fn jpeg(width:u16, height:u16) -> Vec<u8> {
        let mut data = vec![0xFF,0xD8];
        data.extend_from_slice(&[0xFF,0xE0,0x00,0x06,b'J',b'F',b'I',b'F']);
        data.extend_from_slice(&[0xFF,0xFF,0xC0,0x00,0x11,0x08]);
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&[0x03,0x01,0x22,0x00]);
        data
    }

    #[test]
    fn png_header() {
        assert_eq!(png_shape(&png(100,50)).unwrap(), (100,50));
        assert!(png_shape(&png(100,50)[..20]).unwrap_err().is_render_error());
    }

    #[test]
    fn gif_header() {
        let data = b"GIF89a\x20\x03\x58\x02\xf7\0\0".to_vec();
        assert_eq!(gif_shape(&data).unwrap(), (800,600));
        assert!(ImageFormat::Gif.matches_signature(&data));
    }

    #[test]
    fn jpeg_segments_are_skipped() {
        assert_eq!(jpeg_shape(&jpeg(640,480)).unwrap(), (640,480));
        let no_frame = vec![0xFF,0xD8,0xFF,0xE0,0x00,0x04,0x00,0x00,0xFF,0xDA];
        assert!(jpeg_shape(&no_frame).unwrap_err().is_render_error());
        assert!(jpeg_shape(&[0xFF,0xD8,0xFF,0xE0,0x00,0x10]).is_err());
        assert!(jpeg_shape(&[0xFF,0xD8,0xFF,0xE0,0x00,0x01]).is_err());
    }

    #[test]
    fn signatures() {
        assert!(ImageFormat::Png.matches_signature(&png(1,1)));
        assert!(!ImageFormat::Jpg.matches_signature(&png(1,1)));
        assert!(ImageFormat::Jpg.matches_signature(&jpeg(1,1)));
        assert!(ImageFormat::Svg.matches_signature(b"  <svg></svg>"));
    }

    #[test]
    fn scaling_keeps_the_aspect_ratio() {
        let config = |width,height| Config {width,height,..default()};
        let shape  = (100,50);
        assert_eq!(scale(ImageFormat::Png,shape,&config(None,None)).unwrap()          , (100,50));
        assert_eq!(scale(ImageFormat::Png,shape,&config(Some(300),None)).unwrap()     , (300,150));
        assert_eq!(scale(ImageFormat::Png,shape,&config(None,Some(25))).unwrap()      , (50,25));
        assert_eq!(scale(ImageFormat::Png,shape,&config(Some(10),Some(10))).unwrap()  , (10,10));
        assert!(scale(ImageFormat::Png,(0,5),&config(Some(10),None)).is_err());
    }

    #[test]
    fn sources() {
        let bytes = Value::from(png(2,2));
        assert_eq!(Source::find(&bytes,ImageFormat::Png), Some(Source::Object));
        assert_eq!(Source::find(&bytes,ImageFormat::Gif), None);
        let url = Value::from("https://example.com/logo.png");
        assert_eq!(Source::find(&url,ImageFormat::Png), Some(Source::Url("https://example.com/logo.png".into())));
        assert_eq!(Source::find(&url,ImageFormat::Jpg), None);
        assert_eq!(Source::find(&Value::from("missing.png"),ImageFormat::Png), None);
        let markup = Value::from(" <svg width='1'></svg>");
        assert!(matches!(Source::find(&markup,ImageFormat::Svg), Some(Source::Markup(_))));
    }

    #[test]
    fn img_tags() {
        assert_eq!(img_tag("image/png",b"abc",Some(3),Some(4)), "<img src='data:image/png;base64,YWJj' width=3 height=4></img>");
        assert_eq!(img_tag("image/svg+xml",b"abc",None,None), "<img src='data:image/svg+xml;base64,YWJj'></img>");
    }
}
