//! # Solver input writer
//!
//! Serializes a leveling network into the `gama-local` XML input format:
//!
//! ```text
//! <?xml version="1.0"?>
//! <gama-local>
//!   <network angles="left-handed" axes-xy="en" epoch="0.0">
//!     <parameters algorithm="gso" angles="400" conf-pr="0.95" ... />
//!     <description>Nivellementsprojekt 'name'</description>
//!     <points-observations>
//!       <!-- Fixed -->
//!       <point fix="Z" id="A" z="10.0"/>
//!       <!-- Adjusted -->
//!       <point adj="z" id="B"/>
//!       <height-differences>
//!         <dh from="A" to="B" val="+1.500000" dist="100.00000" stdev="0.20000" extern="J1"/>
//!       </height-differences>
//!     </points-observations>
//!   </network>
//! </gama-local>
//! ```
//!
//! Attribute names are fixed by the solver. Excluded observations are skipped; everything else
//! is written in the order it is given, so identical inputs give identical files.
use std::{fmt::Write as _, io::Write};

use camino::Utf8Path;
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use crate::{
    constants::PointId,
    levelnet_errors::LevelnetError,
    levelnet_params::GamaParameters,
    observations::{active, Observation},
    working_set::fixed_points::FixedPoints,
};

/// One `<dh>` record, with the a-priori deviation already computed
#[derive(Debug, Clone, PartialEq)]
struct HeightDifference<'a> {
    from: &'a str,
    to: &'a str,
    val: String,
    dist: String,
    stdev: String,
    journal: &'a str,
}

impl<'a> HeightDifference<'a> {
    fn from_observation(obs: &'a Observation) -> Result<Self, LevelnetError> {
        Ok(HeightDifference {
            from: &obs.from,
            to: &obs.to,
            val: format!("{:+.6}", obs.delta_h),
            dist: format!("{:.5}", obs.distance),
            stdev: format!("{:.5}", obs.apriori_deviation()?),
            journal: &obs.journal,
        })
    }
}

/// Render a float the way the solver input has always carried it: shortest round-trip
/// representation, with a trailing `.0` on integral values.
pub fn fmt_float(value: f64) -> String {
    let text = format!("{value}");
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

/// Quote a project name as an ASCII-only literal.
///
/// The solver rejects bytes above 127 in its input, so non-ASCII code points are escaped as
/// `\xNN`, `\uNNNN` or `\UNNNNNNNN`.
pub fn ascii_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        let code = c as u32;
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ' '..='~' => out.push(c),
            _ if code < 0x100 => {
                let _ = write!(out, "\\x{code:02x}");
            }
            _ if code < 0x10000 => {
                let _ = write!(out, "\\u{code:04x}");
            }
            _ => {
                let _ = write!(out, "\\U{code:08x}");
            }
        }
    }
    out.push('\'');
    out
}

/// Network description handed to the solver.
///
/// Fields
/// -----------------
/// * `project` – Project name, used in the description element.
/// * `parameters` – Global adjustment parameters.
/// * `fixed` – Fixed points and their held heights.
/// * `estimated` – Points to estimate, without initial height.
/// * `observations` – All observations; excluded ones are skipped when writing.
#[derive(Debug, Clone, Copy)]
pub struct GamaInput<'a> {
    pub project: &'a str,
    pub parameters: &'a GamaParameters,
    pub fixed: &'a FixedPoints,
    pub estimated: &'a [PointId],
    pub observations: &'a [Observation],
}

impl<'a> GamaInput<'a> {
    /// Write the XML document to `sink`.
    ///
    /// All a-priori deviations are computed before anything is written, so an observation with
    /// an unknown measurement type or a negative distance leaves `sink` untouched.
    pub fn write<W: Write>(&self, sink: W) -> Result<(), LevelnetError> {
        let records = active(self.observations)
            .map(HeightDifference::from_observation)
            .collect::<Result<Vec<_>, LevelnetError>>()?;

        let mut writer = Writer::new_with_indent(sink, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
        writer.write_event(Event::Start(BytesStart::new("gama-local")))?;

        writer.write_event(Event::Start(BytesStart::new("network").with_attributes([
            ("angles", "left-handed"),
            ("axes-xy", "en"),
            ("epoch", "0.0"),
        ])))?;

        let p = self.parameters;
        let angles = p.angles.to_string();
        let conf_pr = fmt_float(p.conf_pr);
        let cov_band = p.cov_band.to_string();
        let latitude = fmt_float(p.latitude);
        let sigma_apr = fmt_float(p.sigma_apr);
        let tol_abs = fmt_float(p.tol_abs);
        writer.write_event(Event::Empty(BytesStart::new("parameters").with_attributes([
            ("algorithm", p.algorithm.as_str()),
            ("angles", angles.as_str()),
            ("conf-pr", conf_pr.as_str()),
            ("cov-band", cov_band.as_str()),
            ("ellipsoid", p.ellipsoid.as_str()),
            ("latitude", latitude.as_str()),
            ("sigma-act", p.sigma_act.as_str()),
            ("sigma-apr", sigma_apr.as_str()),
            ("tol-abs", tol_abs.as_str()),
        ])))?;

        writer.write_event(Event::Start(BytesStart::new("description")))?;
        let description = format!("Nivellementsprojekt {}", ascii_literal(self.project));
        writer.write_event(Event::Text(BytesText::new(&description)))?;
        writer.write_event(Event::End(BytesEnd::new("description")))?;

        writer.write_event(Event::Start(BytesStart::new("points-observations")))?;

        writer.write_event(Event::Comment(BytesText::new(" Fixed ")))?;
        for (point, height) in self.fixed {
            let z = fmt_float(*height);
            writer.write_event(Event::Empty(BytesStart::new("point").with_attributes([
                ("fix", "Z"),
                ("id", point.as_str()),
                ("z", z.as_str()),
            ])))?;
        }

        writer.write_event(Event::Comment(BytesText::new(" Adjusted ")))?;
        for point in self.estimated {
            writer.write_event(Event::Empty(
                BytesStart::new("point").with_attributes([("adj", "z"), ("id", point.as_str())]),
            ))?;
        }

        writer.write_event(Event::Start(BytesStart::new("height-differences")))?;
        for dh in &records {
            writer.write_event(Event::Empty(BytesStart::new("dh").with_attributes([
                ("from", dh.from),
                ("to", dh.to),
                ("val", dh.val.as_str()),
                ("dist", dh.dist.as_str()),
                ("stdev", dh.stdev.as_str()),
                ("extern", dh.journal),
            ])))?;
        }
        writer.write_event(Event::End(BytesEnd::new("height-differences")))?;

        writer.write_event(Event::End(BytesEnd::new("points-observations")))?;
        writer.write_event(Event::End(BytesEnd::new("network")))?;
        writer.write_event(Event::End(BytesEnd::new("gama-local")))?;
        writer.into_inner().write_all(b"\n")?;

        log::debug!(
            "Wrote solver input for {}: {} fixed, {} adjusted, {} height differences",
            self.project,
            self.fixed.len(),
            self.estimated.len(),
            records.len()
        );
        Ok(())
    }

    /// Render the XML document in memory
    pub fn to_xml_string(&self) -> Result<String, LevelnetError> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Write the XML document to `path`, replacing any previous content.
    pub fn write_file(&self, path: &Utf8Path) -> Result<(), LevelnetError> {
        let xml = self.to_xml_string()?;
        std::fs::write(path, xml)?;
        Ok(())
    }
}

#[cfg(test)]
mod input_writer_test {
    use super::*;

    fn network() -> (FixedPoints, Vec<PointId>, Vec<Observation>) {
        let mut fixed = FixedPoints::new();
        fixed.insert("A".into(), 10.0);
        fixed.insert("K-63-09446".into(), 12.3456);

        let estimated = vec!["B".to_string(), "C".to_string()];

        let observations = vec![
            Observation::new("J1", "A", "B", 1.5, 100.0, 2, "MTL", 2.0, 0.5),
            Observation::new("J2", "B", "C", -0.25, 250.0, 3, "mgl", 0.6, 0.01)
                .with_excluded(true),
            Observation::new("J3", "C", "K-63-09446", 0.8456, 400.0, 4, "MGL", 0.6, 0.01),
            Observation::new("J4", "A", "K-63-09446", 2.3456, 0.0, 0, "NUL", 0.0, 0.0),
        ];
        (fixed, estimated, observations)
    }

    #[test]
    fn test_fmt_float() {
        assert_eq!(fmt_float(10.0), "10.0");
        assert_eq!(fmt_float(0.95), "0.95");
        assert_eq!(fmt_float(1000.0), "1000.0");
        assert_eq!(fmt_float(-3.25), "-3.25");
        assert_eq!(fmt_float(12.3456), "12.3456");
    }

    #[test]
    fn test_ascii_literal() {
        assert_eq!(ascii_literal("Aarhus"), "'Aarhus'");
        assert_eq!(ascii_literal("Sæby"), "'S\\xe6by'");
        assert_eq!(ascii_literal("Ørsted"), "'\\xd8rsted'");
        assert_eq!(ascii_literal("Δh"), "'\\u0394h'");
        assert_eq!(ascii_literal("it's"), "'it\\'s'");
        assert!(ascii_literal("Æblehøj-Ålborg").is_ascii());
    }

    #[test]
    fn test_write_network() {
        let (fixed, estimated, observations) = network();
        let params = GamaParameters::default();
        let xml = GamaInput {
            project: "Sæby",
            parameters: &params,
            fixed: &fixed,
            estimated: &estimated,
            observations: &observations,
        }
        .to_xml_string()
        .unwrap();

        assert!(xml.is_ascii());
        assert!(xml.starts_with("<?xml version=\"1.0\"?>"));
        assert!(xml.contains("<gama-local>"));
        assert!(xml.contains(r#"<network angles="left-handed" axes-xy="en" epoch="0.0">"#));
        assert!(xml.contains(
            r#"<parameters algorithm="gso" angles="400" conf-pr="0.95" cov-band="0" ellipsoid="grs80" latitude="55.7" sigma-act="aposteriori" sigma-apr="1.0" tol-abs="1000.0"/>"#
        ));
        assert!(xml.contains("Nivellementsprojekt"));
        assert!(xml.contains("S\\xe6by"));
        assert!(xml.contains("<!-- Fixed -->"));
        assert!(xml.contains(r#"<point fix="Z" id="A" z="10.0"/>"#));
        assert!(xml.contains(r#"<point fix="Z" id="K-63-09446" z="12.3456"/>"#));
        assert!(xml.contains("<!-- Adjusted -->"));
        assert!(xml.contains(r#"<point adj="z" id="B"/>"#));
        assert!(xml.contains(r#"<point adj="z" id="C"/>"#));

        // sqrt(0.2^2 + 2 * 0.25)
        let stdev = (0.04_f64 + 0.5).sqrt();
        assert!(xml.contains(&format!(
            r#"<dh from="A" to="B" val="+1.500000" dist="100.00000" stdev="{stdev:.5}" extern="J1"/>"#
        )));
        assert!(xml.contains(
            r#"<dh from="A" to="K-63-09446" val="+2.345600" dist="0.00000" stdev="0.00000" extern="J4"/>"#
        ));
        assert!(xml.contains(r#"extern="J3""#));
        assert!(xml.trim_end().ends_with("</gama-local>"));

        // Fixed points come before adjusted points, which come before observations
        let fixed_at = xml.find("fix=\"Z\"").unwrap();
        let adj_at = xml.find("adj=\"z\"").unwrap();
        let dh_at = xml.find("<dh ").unwrap();
        assert!(fixed_at < adj_at && adj_at < dh_at);
    }

    #[test]
    fn test_excluded_observations_are_skipped() {
        let (fixed, estimated, mut observations) = network();
        observations[0].excluded = true;
        observations[3].excluded = true;
        let params = GamaParameters::default();
        let xml = GamaInput {
            project: "p",
            parameters: &params,
            fixed: &fixed,
            estimated: &estimated,
            observations: &observations,
        }
        .to_xml_string()
        .unwrap();

        assert!(!xml.contains(r#"extern="J1""#));
        assert!(!xml.contains(r#"extern="J2""#));
        assert!(!xml.contains(r#"extern="J4""#));
        assert_eq!(xml.matches("<dh ").count(), 1);
        assert!(xml.contains(r#"extern="J3""#));
        assert!(xml.contains(r#"val="+0.845600""#));
    }

    #[test]
    fn test_negative_values_and_determinism() {
        let (fixed, estimated, mut observations) = network();
        observations[1].excluded = false;
        let params = GamaParameters::default();
        let input = GamaInput {
            project: "p",
            parameters: &params,
            fixed: &fixed,
            estimated: &estimated,
            observations: &observations,
        };
        let first = input.to_xml_string().unwrap();
        let second = input.to_xml_string().unwrap();
        assert_eq!(first, second);
        assert!(first.contains(r#"val="-0.250000""#));
        assert!(first.contains(r#"dist="250.00000""#));
    }

    #[test]
    fn test_invalid_observation_writes_nothing() {
        let (fixed, estimated, mut observations) = network();
        observations.push(Observation::new("J9", "B", "C", 0.1, 10.0, 1, "GNSS", 1.0, 1.0));
        let params = GamaParameters::default();

        let mut sink: Vec<u8> = Vec::new();
        let res = GamaInput {
            project: "p",
            parameters: &params,
            fixed: &fixed,
            estimated: &estimated,
            observations: &observations,
        }
        .write(&mut sink);

        assert_eq!(res, Err(LevelnetError::InvalidMeasurementType("GNSS".into())));
        assert!(sink.is_empty());
    }
}
