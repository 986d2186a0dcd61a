use crate::util::{push_attr, push_num_attr};

/// Index of a gradient inside its owning scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GradientId(pub(crate) u32);

#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub offset: f64,
    pub color: String,
    pub opacity: Option<f64>,
}

/// Linear gradient. Coordinates are bounding-box fractions unless `user_space` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub(crate) name: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub user_space: bool,
    pub stops: Vec<Stop>,
}

impl LinearGradient {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            name: String::new(),
            x1,
            y1,
            x2,
            y2,
            user_space: false,
            stops: Vec::new(),
        }
    }

    /// Identity name (`LG<n>`); empty until the gradient is added to a scene.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_stop(&mut self, offset: f64, color: impl Into<String>, opacity: Option<f64>) {
        self.stops.push(Stop {
            offset,
            color: color.into(),
            opacity,
        });
    }

    pub fn with_stop(mut self, offset: f64, color: impl Into<String>) -> Self {
        self.add_stop(offset, color, None);
        self
    }

    pub(crate) fn write_svg(&self, out: &mut String) {
        out.push_str("<linearGradient");
        push_attr(out, "id", &self.name);
        push_num_attr(out, "x1", self.x1);
        push_num_attr(out, "x2", self.x2);
        push_num_attr(out, "y1", self.y1);
        push_num_attr(out, "y2", self.y2);
        if self.user_space {
            push_attr(out, "gradientUnits", "userSpaceOnUse");
        }
        out.push_str(">\n");
        for stop in &self.stops {
            out.push_str("<stop");
            push_attr(out, "stop-color", &stop.color);
            if let Some(opacity) = stop.opacity {
                push_num_attr(out, "stop-opacity", opacity);
            }
            push_num_attr(out, "offset", stop.offset);
            out.push_str("/>\n");
        }
        out.push_str("</linearGradient>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_markup() {
        let mut g = LinearGradient::new(0.0, 0.0, 0.0, 1.0).with_stop(0.0, "#FFFFFF");
        g.add_stop(1.0, "#000000", Some(0.5));
        g.name = "LG7".to_string();
        g.user_space = true;

        let mut s = String::new();
        g.write_svg(&mut s);
        assert_eq!(
            s,
            concat!(
                "<linearGradient id=\"LG7\" x1=\"0\" x2=\"0\" y1=\"0\" y2=\"1\" gradientUnits=\"userSpaceOnUse\">\n",
                "<stop stop-color=\"#FFFFFF\" offset=\"0\"/>\n",
                "<stop stop-color=\"#000000\" stop-opacity=\"0.5\" offset=\"1\"/>\n",
                "</linearGradient>"
            )
        );
    }
}
