use palette::{FromColor, Hsv, Srgb};

/// Linear 0..1 RGB triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Rgb {
    /// `#RRGGBB`, upper-case, channels clamped to 0..1 and rounded.
    pub fn to_hex(self) -> String {
        let c: Srgb<u8> = Srgb::new(
            self.red.clamp(0.0, 1.0),
            self.green.clamp(0.0, 1.0),
            self.blue.clamp(0.0, 1.0),
        )
        .into_format();
        format!("#{:02X}{:02X}{:02X}", c.red, c.green, c.blue)
    }
}

/// HSB (a.k.a. HSV) to RGB. `hue` is in turns and wraps (`1.25` == `0.25`); saturation and
/// brightness are clamped to 0..1.
pub fn hsb_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgb {
    let hue_deg = (hue - hue.floor()) * 360.0 % 360.0;
    let saturation = saturation.clamp(0.0, 1.0);
    let value = value.clamp(0.0, 1.0);

    let hsv = Hsv::<palette::encoding::Srgb, f64>::new(hue_deg, saturation, value);
    let rgb = Srgb::<f64>::from_color(hsv);
    Rgb {
        red: rgb.red,
        green: rgb.green,
        blue: rgb.blue,
    }
}

pub fn hsb_to_hex(hue: f64, saturation: f64, value: f64) -> String {
    hsb_to_rgb(hue, saturation, value).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues() {
        assert_eq!(hsb_to_hex(0.0, 1.0, 1.0), "#FF0000");
        assert_eq!(hsb_to_hex(1.0 / 3.0, 1.0, 1.0), "#00FF00");
        assert_eq!(hsb_to_hex(2.0 / 3.0, 1.0, 1.0), "#0000FF");
    }

    #[test]
    fn hue_wraps_in_turns() {
        assert_eq!(hsb_to_hex(1.0, 1.0, 1.0), hsb_to_hex(0.0, 1.0, 1.0));
        assert_eq!(hsb_to_hex(-0.5, 1.0, 1.0), "#00FFFF");
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert_eq!(hsb_to_hex(0.7, 0.0, 0.5), "#808080");
        assert_eq!(hsb_to_hex(0.7, -1.0, 2.0), "#FFFFFF");
    }

    #[test]
    fn hex_is_upper_case_and_padded() {
        let rgb = Rgb {
            red: 0.0,
            green: 10.0 / 255.0,
            blue: 1.5,
        };
        assert_eq!(rgb.to_hex(), "#000AFF");
    }
}
