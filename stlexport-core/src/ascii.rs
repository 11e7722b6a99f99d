//! ASCII STL encoding
use std::fmt;

use crate::serializer::{FacetScratch, FacetWriter};

pub const SOLID_NAME: &str = "exported";

/// Shortest decimal that reads back as the same f32, with `-0` printed as `0`
struct Num(f32);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Accumulates the text of an ASCII solid
pub struct AsciiWriter {
    out: String,
}

impl AsciiWriter {
    pub fn new() -> Self {
        let mut out = String::new();
        out.push_str("solid ");
        out.push_str(SOLID_NAME);
        out.push('\n');
        Self { out }
    }

    pub fn finish(mut self) -> String {
        self.out.push_str("endsolid ");
        self.out.push_str(SOLID_NAME);
        self.out.push('\n');
        self.out
    }
}

impl Default for AsciiWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FacetWriter for AsciiWriter {
    fn write_facet(&mut self, facet: &FacetScratch) {
        let n = &facet.normal;
        self.out.push_str(&format!(
            "\tfacet normal {} {} {}\n",
            Num(n.x),
            Num(n.y),
            Num(n.z)
        ));
        self.out.push_str("\t\touter loop\n");
        for v in [&facet.a, &facet.b, &facet.c] {
            self.out
                .push_str(&format!("\t\t\tvertex {} {} {}\n", Num(v.x), Num(v.y), Num(v.z)));
        }
        self.out.push_str("\t\tendloop\n");
        self.out.push_str("\tendfacet\n");
    }
}
