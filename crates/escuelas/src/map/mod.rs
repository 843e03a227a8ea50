//! Leaflet map artifact for the capped result set.
//!
//! Produces a self-contained HTML document: tile layer, clustered circle
//! markers, hover tooltip with the working-center code, and a popup with a
//! copy-to-clipboard button. Record values pass through HTML and script
//! escaping before they reach the document, so hostile cell content cannot
//! inject markup or code.

use polars::prelude::*;

use escuelas_dataset::schema;

pub use error::MapError;
mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum MapError {
        #[error("DataFrame error: {0}")]
        DataFrame(#[from] polars::prelude::PolarsError),
        #[error("Serialization error: {0}")]
        Serde(#[from] serde_json::Error),
    }
    pub type Result<T> = std::result::Result<T, MapError>;
}
use error::Result;

/// Geographic center of Mexico, used when the result set is empty.
pub const DEFAULT_CENTER: (f64, f64) = (23.6345, -102.5528);

pub const DEFAULT_ZOOM: u8 = 8;

const MAX_CLUSTER_RADIUS: u32 = 50;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const CLUSTER_CSS: &str = "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css";
const CLUSTER_DEFAULT_CSS: &str =
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css";
const CLUSTER_JS: &str =
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js";

/// Mean coordinate of the set, or [`DEFAULT_CENTER`] when it is empty.
pub fn map_center(df: &DataFrame) -> Result<(f64, f64)> {
    if df.height() == 0 {
        return Ok(DEFAULT_CENTER);
    }
    let lat = df.column(schema::LATITUDE)?.f64()?.mean();
    let lon = df.column(schema::LONGITUDE)?.f64()?.mean();
    Ok(match (lat, lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => DEFAULT_CENTER,
    })
}

/// Render the capped result set as a standalone Leaflet document.
///
/// `click_to_copy_label` is the localized caption of the popup button.
pub fn render_map(
    df: &DataFrame,
    center: (f64, f64),
    click_to_copy_label: &str,
) -> Result<String> {
    let markers = marker_script(df, click_to_copy_label)?;
    // The alert prefix ends up inside a script string: JSON-encode it.
    let label_js = serde_json::to_string(click_to_copy_label)?;

    let mut html = String::with_capacity(4096 + markers.len());
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Escuelas</title>\n");
    for css in [LEAFLET_CSS, CLUSTER_CSS, CLUSTER_DEFAULT_CSS] {
        html.push_str(&format!("<link rel=\"stylesheet\" href=\"{css}\">\n"));
    }
    for js in [LEAFLET_JS, CLUSTER_JS] {
        html.push_str(&format!("<script src=\"{js}\"></script>\n"));
    }
    html.push_str(concat!(
        "<style>\n",
        "html, body, #map { height: 100%; margin: 0; }\n",
        ".leaflet-tooltip { font-size: 11px !important; max-width: 300px !important; line-height: 1.3 !important; }\n",
        ".leaflet-tooltip * { font-size: 11px !important; }\n",
        "</style>\n",
    ));
    html.push_str(&clipboard_script(&label_js));
    html.push_str("</head>\n<body>\n<div id=\"map\"></div>\n<script>\n");
    html.push_str(&format!(
        "var map = L.map('map').setView([{lat}, {lon}], {zoom});\n",
        lat = center.0,
        lon = center.1,
        zoom = DEFAULT_ZOOM,
    ));
    html.push_str(concat!(
        "L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', ",
        "{ maxZoom: 19, attribution: '&copy; OpenStreetMap contributors' }).addTo(map);\n",
    ));
    html.push_str(&format!(
        "var cluster = L.markerClusterGroup({{ maxClusterRadius: {MAX_CLUSTER_RADIUS} }});\n"
    ));
    html.push_str(&markers);
    html.push_str("map.addLayer(cluster);\n</script>\n</body>\n</html>\n");
    Ok(html)
}

fn clipboard_script(label_js: &str) -> String {
    format!(
        concat!(
            "<script>\n",
            "function copyToClipboard(text) {{\n",
            "  var done = function() {{ alert('\\u{{1F4CB}} ' + {label} + ': ' + text); }};\n",
            "  if (navigator.clipboard) {{\n",
            "    navigator.clipboard.writeText(text).then(done).catch(function(err) {{\n",
            "      console.error('Error copying: ', err);\n",
            "    }});\n",
            "  }} else {{\n",
            "    var textArea = document.createElement('textarea');\n",
            "    textArea.value = text;\n",
            "    textArea.style.position = 'fixed';\n",
            "    document.body.appendChild(textArea);\n",
            "    textArea.focus();\n",
            "    textArea.select();\n",
            "    try {{\n",
            "      document.execCommand('copy');\n",
            "      done();\n",
            "    }} catch (err) {{\n",
            "      console.error('Fallback: Could not copy', err);\n",
            "    }}\n",
            "    document.body.removeChild(textArea);\n",
            "  }}\n",
            "}}\n",
            "</script>\n",
        ),
        label = label_js,
    )
}

fn marker_script(df: &DataFrame, click_to_copy_label: &str) -> Result<String> {
    let codes = df.column(schema::CODE)?.str()?;
    let names = df.column(schema::SCHOOL_NAME)?.str()?;
    let latitudes = df.column(schema::LATITUDE)?.f64()?;
    let longitudes = df.column(schema::LONGITUDE)?.f64()?;

    let label_html = escape_html(click_to_copy_label);

    let mut script = String::new();
    for i in 0..df.height() {
        let (Some(lat), Some(lon)) = (latitudes.get(i), longitudes.get(i)) else {
            continue;
        };
        let code = codes.get(i).unwrap_or("N/A");
        let school = names.get(i).unwrap_or("Sin nombre");

        let code_html = escape_html(code);
        let school_html = escape_html(school);
        // The onclick argument lives inside a single-quoted script string
        // inside an HTML attribute: script-escape first, then HTML-escape.
        let code_onclick = escape_html(&escape_js_single_quoted(code));

        let popup_html = format!(
            concat!(
                "<div style=\"font-size: 12px; min-width: 200px;\">",
                "<b style=\"font-size: 13px;\">{code}</b><br>",
                "{school}<br>",
                "<button onclick=\"copyToClipboard('{code_onclick}')\" ",
                "style=\"margin-top: 8px; padding: 5px 10px; cursor: pointer; ",
                "background-color: #4CAF50; color: white; border: none; ",
                "border-radius: 3px;\">",
                "\u{1F4CB} {label}",
                "</button></div>",
            ),
            code = code_html,
            school = school_html,
            code_onclick = code_onclick,
            label = label_html,
        );
        let tooltip_html =
            format!("<div style=\"font-size: 11px;\"><b>{code_html}</b></div>");

        // JSON encoding turns the markup into safely quoted script literals.
        let popup_js = serde_json::to_string(&popup_html)?;
        let tooltip_js = serde_json::to_string(&tooltip_html)?;

        script.push_str(&format!(
            concat!(
                "L.circleMarker([{lat}, {lon}], ",
                "{{ radius: 6, color: 'blue', fill: true, fillColor: 'blue', ",
                "fillOpacity: 0.7, weight: 2 }})",
                ".bindPopup({popup}, {{ maxWidth: 300 }})",
                ".bindTooltip({tooltip})",
                ".addTo(cluster);\n",
            ),
            lat = lat,
            lon = lon,
            popup = popup_js,
            tooltip = tooltip_js,
        ));
    }
    Ok(script)
}

/// Escape the HTML special characters, quotes included.
fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

/// Escape a value for embedding in a single-quoted script string.
fn escape_js_single_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use escuelas_dataset::{TestDataConfig, test_data::test_frame};

    use super::*;

    fn fixture() -> DataFrame {
        test_frame(&TestDataConfig::minimal()).unwrap()
    }

    #[test]
    fn test_map_center_is_the_mean_coordinate() {
        let df = fixture();
        let (lat, lon) = map_center(&df).unwrap();

        let lats = df.column(schema::LATITUDE).unwrap().f64().unwrap();
        let lons = df.column(schema::LONGITUDE).unwrap().f64().unwrap();
        assert!((lat - lats.mean().unwrap()).abs() < 1e-9);
        assert!((lon - lons.mean().unwrap()).abs() < 1e-9);
    }

    #[test]
    fn test_empty_set_falls_back_to_default_center() {
        let df = fixture().slice(0, 0);
        assert_eq!(map_center(&df).unwrap(), DEFAULT_CENTER);
    }

    #[test]
    fn test_render_contains_one_marker_per_record() {
        let df = fixture();
        let html = render_map(&df, DEFAULT_CENTER, "Click to copy code").unwrap();

        assert_eq!(html.matches("L.circleMarker(").count(), df.height());
        assert!(html.contains("markerClusterGroup"));
        assert!(html.contains("maxClusterRadius: 50"));
        assert!(html.contains("setView([23.6345, -102.5528], 8)"));
    }

    #[test]
    fn test_record_content_is_escaped() {
        let df = polars::prelude::df!(
            schema::CODE => ["<script>alert('x')</script>"],
            schema::STATE => ["Oaxaca"],
            schema::MUNICIPALITY => ["Oaxaca de Juárez"],
            schema::LOCALITY => ["Centro"],
            schema::SCHOOL_NAME => ["ESCUELA \"COMILLAS\" & CIA"],
            schema::LATITUDE => [17.0654],
            schema::LONGITUDE => [-96.7266],
        )
        .unwrap();

        let html = render_map(&df, DEFAULT_CENTER, "Copy").unwrap();

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&quot;COMILLAS&quot;"));
        assert!(html.contains("&amp; CIA"));
    }

    #[test]
    fn test_localized_label_reaches_popup_and_alert() {
        let df = fixture();
        let html = render_map(&df, DEFAULT_CENTER, "Clic para copiar código").unwrap();

        assert!(html.contains("Clic para copiar código"));
    }

    #[test]
    fn test_missing_code_renders_placeholder() {
        let df = polars::prelude::df!(
            schema::CODE => [None::<&str>],
            schema::STATE => [Some("Oaxaca")],
            schema::MUNICIPALITY => [Some("Oaxaca de Juárez")],
            schema::LOCALITY => [None::<&str>],
            schema::SCHOOL_NAME => [None::<&str>],
            schema::LATITUDE => [17.0654],
            schema::LONGITUDE => [-96.7266],
        )
        .unwrap();

        let html = render_map(&df, DEFAULT_CENTER, "Copy").unwrap();
        assert!(html.contains("N/A"));
        assert!(html.contains("Sin nombre"));
    }
}
