//! UI language support.
//!
//! The browser surface is bilingual; every user-visible string lives here
//! so the pipeline itself stays language-free. Strings containing `{}`
//! expect a preformatted value (see [`fmt_count`]) substituted by the
//! embedding surface.

use escuelas_dataset::schema;

/// Supported UI languages. Spanish is the default surface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Language {
    En,
    #[default]
    Es,
}

impl Language {
    /// Parse a language tag as used by the language selector.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    pub const fn translations(self) -> &'static Translations {
        match self {
            Self::En => &EN,
            Self::Es => &ES,
        }
    }
}

/// Localized strings for one language.
#[derive(Debug)]
pub struct Translations {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub map_filters: &'static str,
    pub centro_trabajo_codigo: &'static str,
    pub departamento: &'static str,
    pub municipio: &'static str,
    pub select_first: &'static str,
    pub points_on_map: &'static str,
    pub map_view: &'static str,
    pub map_info: &'static str,
    pub data_table: &'static str,
    pub table_subtitle: &'static str,
    pub search_placeholder: &'static str,
    pub total_records: &'static str,
    pub found_records: &'static str,
    pub showing_records: &'static str,
    pub page: &'static str,
    pub rows_per_page: &'static str,
    pub download_all: &'static str,
    pub download_filtered: &'static str,
    pub download_visible: &'static str,
    pub download_disabled_help: &'static str,
    pub language: &'static str,
    pub name: &'static str,
    pub locality: &'static str,
    pub description: &'static str,
    pub click_to_copy: &'static str,
}

static EN: Translations = Translations {
    title: "📍 Schools México - Interactive Map",
    subtitle: "Explore **{}** school points with filtering and sorting.",
    map_filters: "🎛️ Map Filters",
    centro_trabajo_codigo: "Working center code",
    departamento: "State",
    municipio: "Municipality",
    select_first: "Select State first",
    points_on_map: "🗺️ **{}** points on map",
    map_view: "📍 Map View",
    map_info: "ℹ️ Displaying {} points. Click on a marker to copy the code to clipboard.",
    data_table: "📊 Data Table - Filtered Records",
    table_subtitle: "Showing data based on map filters. Use search and column sorting to explore.",
    search_placeholder: "🔍 Search in table (name, locality, etc.)",
    total_records: "**Total: {} records**",
    found_records: "Found {} matching records",
    showing_records: "Showing {} of {} records",
    page: "Page",
    rows_per_page: "Rows per page",
    download_all: "💾 Download All Data",
    download_filtered: "💾 Download Filtered",
    download_visible: "💾 Download Current Page",
    download_disabled_help: "Use search to filter data first",
    language: "Language",
    name: "School Name",
    locality: "Locality",
    description: "Description",
    click_to_copy: "Click to copy code",
};

static ES: Translations = Translations {
    title: "📍 Escuelas México - Mapa Interactivo",
    subtitle: "Explora **{}** puntos de escuelas con filtrado y ordenamiento.",
    map_filters: "🎛️ Filtros de Mapa",
    centro_trabajo_codigo: "Código centro de trabajo",
    departamento: "Entidad",
    municipio: "Municipio",
    select_first: "Selecciona Entidad primero",
    points_on_map: "🗺️ **{}** puntos en el mapa",
    map_view: "📍 Vista de Mapa",
    map_info: "ℹ️ Mostrando {} puntos. Haz clic en un marcador para copiar el código.",
    data_table: "📊 Tabla de Datos - Registros Filtrados",
    table_subtitle: "Mostrando datos basados en filtros del mapa. Usa búsqueda y ordenamiento de columnas.",
    search_placeholder: "🔍 Buscar en tabla (nombre, localidad, etc.)",
    total_records: "**Total: {} registros**",
    found_records: "Se encontraron {} registros coincidentes",
    showing_records: "Mostrando {} de {} registros",
    page: "Página",
    rows_per_page: "Filas por página",
    download_all: "💾 Descargar Todo",
    download_filtered: "💾 Descargar Filtrado",
    download_visible: "💾 Descargar Página Actual",
    download_disabled_help: "Usa búsqueda para filtrar datos primero",
    language: "Idioma",
    name: "Nombre de Escuela",
    locality: "Localidad",
    description: "Descripción",
    click_to_copy: "Clic para copiar código",
};

/// Localized header label for a display column, if `column` is one.
pub fn column_label(language: Language, column: &str) -> Option<&'static str> {
    let t = language.translations();
    match column {
        schema::CODE => Some(t.centro_trabajo_codigo),
        schema::STATE => Some(t.departamento),
        schema::MUNICIPALITY => Some(t.municipio),
        schema::LOCALITY => Some(t.locality),
        schema::SCHOOL_NAME => Some(t.name),
        _ => None,
    }
}

/// Thousands-separated count, for the `{}` slots in counter strings.
pub fn fmt_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_language_is_spanish() {
        assert_eq!(Language::default(), Language::Es);
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(Language::from_tag("en"), Some(Language::En));
        assert_eq!(Language::from_tag(" ES "), Some(Language::Es));
        assert_eq!(Language::from_tag("fr"), None);
    }

    #[test]
    fn test_every_display_column_has_a_label_in_both_languages() {
        for language in [Language::En, Language::Es] {
            for column in schema::DISPLAY_COLUMNS {
                let label = column_label(language, column);
                assert!(
                    label.is_some_and(|l| !l.is_empty()),
                    "Missing label for {column} in {language:?}"
                );
            }
        }
    }

    #[test]
    fn test_coordinates_have_no_label() {
        assert_eq!(column_label(Language::Es, schema::LATITUDE), None);
        assert_eq!(column_label(Language::Es, schema::LONGITUDE), None);
    }

    #[test]
    fn test_fmt_count() {
        assert_eq!(fmt_count(0), "0");
        assert_eq!(fmt_count(999), "999");
        assert_eq!(fmt_count(1000), "1,000");
        assert_eq!(fmt_count(12500), "12,500");
        assert_eq!(fmt_count(1234567), "1,234,567");
    }
}
