//! Shared fixtures: a small western-Europe variant and matching templates.

#![allow(dead_code)]

use cartographer::board::{Phase, ProvinceNode, Unit, Variant};

/// Map with one shape and one anchor per location.
pub const MAP_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="400" height="600" viewBox="0 0 400 600">
  <g id="provinces">
    <path id="lon" d="M80 80h40v40h-40z" fill="#ffffff"/>
    <path id="eng" d="M60 180h80v40h-80z" fill="#ffffff"/>
    <path id="bre" d="M60 280h40v40h-40z" fill="#ffffff"/>
    <path id="pic" d="M160 230h40v40h-40z" fill="#ffffff"/>
    <path id="par" d="M180 300h40v40h-40z" style="fill:#ffffff;stroke:#000000"/>
    <path id="bur" d="M280 300h40v40h-40z" fill="#ffffff"/>
    <path id="gas" d="M130 400h40v40h-40z" fill="#ffffff"/>
    <path id="mao" d="M0 380h40v40h-40z" fill="#ffffff"/>
    <path id="spa" d="M100 500h40v40h-40z" fill="#ffffff"/>
  </g>
  <g id="province-centers">
    <circle id="lonCenter" cx="100" cy="100" r="1"/>
    <circle id="engCenter" cx="100" cy="200" r="1"/>
    <circle id="breCenter" cx="80" cy="300" r="1"/>
    <circle id="picCenter" cx="180" cy="250" r="1"/>
    <circle id="parCenter" cx="200" cy="320" r="1"/>
    <circle id="burCenter" cx="300" cy="320" r="1"/>
    <circle id="gasCenter" cx="150" cy="420" r="1"/>
    <circle id="maoCenter" cx="20" cy="400" r="1"/>
    <circle id="spaCenter" cx="120" cy="520" r="1"/>
    <circle id="spa/ncCenter" cx="100" cy="480" r="1"/>
    <circle id="spa/scCenter" cx="160" cy="560" r="1"/>
  </g>
</svg>
"##;

/// 20x20 army drawn from a 40x40 viewBox, with a tintable body and a
/// gradient referenced by id.
pub const ARMY_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 40 40">
  <defs><linearGradient id="shine"><stop offset="0" stop-color="#ffffff"/></linearGradient></defs>
  <path id="body" d="M4 36L20 4L36 36z" fill="#000000"/>
  <path d="M10 30h20" stroke="url(#shine)"/>
</svg>
"##;

/// 30x16 fleet without a body element; the whole icon is tinted.
pub const FLEET_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 30 16">
  <path d="M0 8h30l-6 8h-18z"/>
</svg>
"#;

/// Dislodged icons sit this far from their anchor: the widest icon
/// (fleet, 30) and half the tallest (army, 20).
pub const DISLODGED_DX: f64 = 30.0;
pub const DISLODGED_DY: f64 = 10.0;

pub fn variant() -> Variant {
    let nodes = [
        ProvinceNode::new("lon")
            .supply_center("England")
            .sub_flags("", &["Land"])
            .edge("", "eng", &["Sea"]),
        ProvinceNode::new("eng")
            .sub_flags("", &["Sea"])
            .edge("", "lon", &["Sea"])
            .edge("", "bre", &["Sea"])
            .edge("", "pic", &["Sea"])
            .edge("", "mao", &["Sea"]),
        ProvinceNode::new("bre")
            .supply_center("France")
            .sub_flags("", &["Land"])
            .edge("", "eng", &["Sea"])
            .edge("", "mao", &["Sea"])
            .edge("", "pic", &["Land", "Sea"])
            .edge("", "par", &["Land"])
            .edge("", "gas", &["Land", "Sea"]),
        ProvinceNode::new("pic")
            .sub_flags("", &["Land"])
            .edge("", "eng", &["Sea"])
            .edge("", "bre", &["Land", "Sea"])
            .edge("", "par", &["Land"])
            .edge("", "bur", &["Land"]),
        ProvinceNode::new("par")
            .supply_center("France")
            .sub_flags("", &["Land"])
            .edge("", "bre", &["Land"])
            .edge("", "pic", &["Land"])
            .edge("", "bur", &["Land"])
            .edge("", "gas", &["Land"]),
        ProvinceNode::new("bur")
            .sub_flags("", &["Land"])
            .edge("", "pic", &["Land"])
            .edge("", "par", &["Land"])
            .edge("", "gas", &["Land"]),
        ProvinceNode::new("gas")
            .sub_flags("", &["Land"])
            .edge("", "bre", &["Land", "Sea"])
            .edge("", "par", &["Land"])
            .edge("", "bur", &["Land"])
            .edge("", "mao", &["Sea"])
            .edge("", "spa", &["Land"]),
        ProvinceNode::new("mao")
            .sub_flags("", &["Sea"])
            .edge("", "eng", &["Sea"])
            .edge("", "bre", &["Sea"])
            .edge("", "gas", &["Sea"])
            .edge("", "spa/nc", &["Sea"])
            .edge("", "spa/sc", &["Sea"]),
        ProvinceNode::new("spa")
            .supply_center("")
            .sub_flags("", &["Land"])
            .sub_flags("nc", &["Sea"])
            .sub_flags("sc", &["Sea"])
            .edge("", "gas", &["Land"])
            .edge("nc", "mao", &["Sea"])
            .edge("sc", "mao", &["Sea"]),
    ];
    Variant {
        name: "Mini".to_string(),
        nations: ["England", "France", "Germany"].map(String::from).to_vec(),
        graph: nodes.into_iter().map(|n| (n.name.clone(), n)).collect(),
        unit_types: vec!["Army".to_string(), "Fleet".to_string()],
        province_long_names: [("par", "Paris"), ("bur", "Burgundy")]
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .into(),
        ..Variant::default()
    }
}

/// Spring 1901 with France in Paris and Brest and England in London.
pub fn spring() -> Phase {
    let mut phase = Phase::empty(1, "Spring", 1901, "Movement");
    phase.set_sc_owner("lon", "England");
    phase.set_sc_owner("par", "France");
    phase.set_sc_owner("bre", "France");
    phase.place_unit("par", Unit::army("France"));
    phase.place_unit("bre", Unit::fleet("France"));
    phase.place_unit("lon", Unit::army("England"));
    phase
}

/// Returns the first tag in `svg` whose id is exactly `id`.
pub fn tag_with_id<'a>(svg: &'a str, id: &str) -> Option<&'a str> {
    let needle = format!(" id=\"{id}\"");
    let at = svg.find(&needle)?;
    let start = svg[..at].rfind('<')?;
    let end = at + svg[at..].find('>')?;
    Some(&svg[start..=end])
}

/// Returns the value of `name` inside one tag.
pub fn attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!(" {name}=\"");
    let at = tag.find(&needle)? + needle.len();
    let len = tag[at..].find('"')?;
    Some(&tag[at..at + len])
}

/// Number of occurrences of `needle` in `svg`.
pub fn count(svg: &str, needle: &str) -> usize {
    svg.matches(needle).count()
}
