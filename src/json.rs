//! JSON serialization guard for computed examples.
//!
//! Strict JSON has no representation for `NaN` or the infinities, but the
//! fields in an [`Example`] may legitimately contain them. [`to_json_safe`]
//! first attempts a strict encoding; when the record holds non-finite values
//! it falls back to a permissive encoding that writes them as the bare
//! tokens `NaN`, `Infinity` and `-Infinity` — the same lenient dialect the
//! presentation layer's JSON parser accepts — so the numeric payload still
//! round-trips instead of crashing the pipeline.
//!
//! The payload layout mirrors what the plotting layer consumes: coordinate
//! matrices and axis vectors under `plot_data`, mesh metadata, field stats,
//! and the validation reports per derivative direction.

use ndarray::{Array1, Array2};
use serde::Serialize;

use crate::errors::PipelineError;
use crate::mesh::Domain;
use crate::pipeline::{Example, FieldStats};
use crate::validate::ValidationReport;

// Sentinel strings stand in for non-finite floats during the permissive
// encode and are rewritten to bare tokens afterwards. Chosen so they cannot
// collide with any expression or description text.
const NAN_SENTINEL: &str = "\u{1}NaN\u{1}";
const INF_SENTINEL: &str = "\u{1}Infinity\u{1}";
const NEG_INF_SENTINEL: &str = "\u{1}-Infinity\u{1}";

/// A float that serializes non-finite values as sentinel strings.
struct LenientFloat(f64);

impl Serialize for LenientFloat {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_finite() {
            serializer.serialize_f64(self.0)
        } else if self.0.is_nan() {
            serializer.serialize_str(NAN_SENTINEL)
        } else if self.0 > 0.0 {
            serializer.serialize_str(INF_SENTINEL)
        } else {
            serializer.serialize_str(NEG_INF_SENTINEL)
        }
    }
}

#[derive(Serialize)]
struct MeshInfo {
    nx: usize,
    ny: usize,
    hx: f64,
    hy: f64,
}

#[derive(Serialize)]
struct PlotData<T: Serialize> {
    x: Vec<Vec<T>>,
    y: Vec<Vec<T>>,
    z: Vec<Vec<T>>,
    df_dx: Vec<Vec<T>>,
    df_dy: Vec<Vec<T>>,
    x_vector: Vec<T>,
    y_vector: Vec<T>,
}

#[derive(Serialize)]
struct LenientStats {
    f_min: LenientFloat,
    f_max: LenientFloat,
    df_dx_min: LenientFloat,
    df_dx_max: LenientFloat,
    df_dy_min: LenientFloat,
    df_dy_max: LenientFloat,
}

#[derive(Serialize)]
struct LenientReport {
    max_abs_error: LenientFloat,
    mean_abs_error: LenientFloat,
    max_rel_error: LenientFloat,
    mean_rel_error: LenientFloat,
    rmse: LenientFloat,
    l2_norm: LenientFloat,
    degenerate: bool,
}

#[derive(Serialize)]
struct LenientValidationPair {
    df_dx: LenientReport,
    df_dy: LenientReport,
}

#[derive(Serialize)]
struct Payload<'a, T: Serialize, V: Serialize> {
    id: u32,
    name: &'a str,
    description: &'a str,
    function: &'a str,
    analytical_dx: &'a str,
    analytical_dy: &'a str,
    domain: &'a Domain,
    mesh: MeshInfo,
    plot_data: PlotData<T>,
    stats: V,
    validation: LenientValidationPair,
}

fn rows<T>(field: &Array2<f64>, wrap: impl Fn(f64) -> T) -> Vec<Vec<T>> {
    field
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|&v| wrap(v)).collect())
        .collect()
}

fn vector<T>(v: &Array1<f64>, wrap: impl Fn(f64) -> T) -> Vec<T> {
    v.iter().map(|&x| wrap(x)).collect()
}

fn lenient_report(report: &ValidationReport) -> LenientReport {
    LenientReport {
        max_abs_error: LenientFloat(report.max_abs_error),
        mean_abs_error: LenientFloat(report.mean_abs_error),
        max_rel_error: LenientFloat(report.max_rel_error),
        mean_rel_error: LenientFloat(report.mean_rel_error),
        rmse: LenientFloat(report.rmse),
        l2_norm: LenientFloat(report.l2_norm),
        degenerate: report.degenerate,
    }
}

fn lenient_stats(stats: &FieldStats) -> LenientStats {
    LenientStats {
        f_min: LenientFloat(stats.f_min),
        f_max: LenientFloat(stats.f_max),
        df_dx_min: LenientFloat(stats.df_dx_min),
        df_dx_max: LenientFloat(stats.df_dx_max),
        df_dy_min: LenientFloat(stats.df_dy_min),
        df_dy_max: LenientFloat(stats.df_dy_max),
    }
}

fn has_non_finite(example: &Example) -> bool {
    let arrays = [
        &example.z,
        &example.numerical_dx,
        &example.numerical_dy,
        &example.analytical_dx,
        &example.analytical_dy,
    ];
    if arrays.iter().any(|a| a.iter().any(|v| !v.is_finite())) {
        return true;
    }
    let scalars = [
        example.stats.f_min,
        example.stats.f_max,
        example.stats.df_dx_min,
        example.stats.df_dx_max,
        example.stats.df_dy_min,
        example.stats.df_dy_max,
    ];
    let reports = [&example.validation_dx, &example.validation_dy];
    scalars.iter().any(|v| !v.is_finite())
        || reports.iter().any(|r| {
            [
                r.max_abs_error,
                r.mean_abs_error,
                r.max_rel_error,
                r.mean_rel_error,
                r.rmse,
                r.l2_norm,
            ]
            .iter()
            .any(|v| !v.is_finite())
        })
}

/// Encodes an example as JSON, guarding against non-finite values.
///
/// When every float in the record is finite the output is strict JSON.
/// Otherwise the record is re-encoded with `NaN`/`Infinity`/`-Infinity` as
/// bare tokens, which strict parsers reject but the permissive consumer
/// accepts.
pub fn to_json_safe(example: &Example) -> Result<Vec<u8>, PipelineError> {
    if !has_non_finite(example) {
        let payload = Payload {
            id: example.spec.id,
            name: &example.spec.name,
            description: &example.spec.description,
            function: &example.spec.function,
            analytical_dx: &example.spec.analytical_dx,
            analytical_dy: &example.spec.analytical_dy,
            domain: &example.spec.domain,
            mesh: MeshInfo {
                nx: example.spec.mesh.nx,
                ny: example.spec.mesh.ny,
                hx: example.grid.hx,
                hy: example.grid.hy,
            },
            plot_data: PlotData {
                x: rows(&example.grid.x, |v| v),
                y: rows(&example.grid.y, |v| v),
                z: rows(&example.z, |v| v),
                df_dx: rows(&example.numerical_dx, |v| v),
                df_dy: rows(&example.numerical_dy, |v| v),
                x_vector: vector(&example.grid.x_vector, |v| v),
                y_vector: vector(&example.grid.y_vector, |v| v),
            },
            stats: example.stats,
            validation: LenientValidationPair {
                df_dx: lenient_report(&example.validation_dx),
                df_dy: lenient_report(&example.validation_dy),
            },
        };
        return Ok(serde_json::to_vec(&payload)?);
    }

    // U+0001 must not survive in any user-supplied string, or the token
    // rewrite below could touch it; the expressions cannot contain it (the
    // parser rejects control characters) but name/description are free text
    let name = strip_sentinel_byte(&example.spec.name);
    let description = strip_sentinel_byte(&example.spec.description);
    let function = strip_sentinel_byte(&example.spec.function);
    let analytical_dx = strip_sentinel_byte(&example.spec.analytical_dx);
    let analytical_dy = strip_sentinel_byte(&example.spec.analytical_dy);
    let payload = Payload {
        id: example.spec.id,
        name: &name,
        description: &description,
        function: &function,
        analytical_dx: &analytical_dx,
        analytical_dy: &analytical_dy,
        domain: &example.spec.domain,
        mesh: MeshInfo {
            nx: example.spec.mesh.nx,
            ny: example.spec.mesh.ny,
            hx: example.grid.hx,
            hy: example.grid.hy,
        },
        plot_data: PlotData {
            x: rows(&example.grid.x, LenientFloat),
            y: rows(&example.grid.y, LenientFloat),
            z: rows(&example.z, LenientFloat),
            df_dx: rows(&example.numerical_dx, LenientFloat),
            df_dy: rows(&example.numerical_dy, LenientFloat),
            x_vector: vector(&example.grid.x_vector, LenientFloat),
            y_vector: vector(&example.grid.y_vector, LenientFloat),
        },
        stats: lenient_stats(&example.stats),
        validation: LenientValidationPair {
            df_dx: lenient_report(&example.validation_dx),
            df_dy: lenient_report(&example.validation_dy),
        },
    };
    let encoded = serde_json::to_string(&payload)?;
    let encoded = encoded
        .replace(&format!("\"{}\"", escape(NAN_SENTINEL)), "NaN")
        .replace(&format!("\"{}\"", escape(INF_SENTINEL)), "Infinity")
        .replace(&format!("\"{}\"", escape(NEG_INF_SENTINEL)), "-Infinity");
    Ok(encoded.into_bytes())
}

// serde_json writes the U+0001 bytes of the sentinels as \u0001 escapes
fn escape(sentinel: &str) -> String {
    sentinel.replace('\u{1}', "\\u0001")
}

fn strip_sentinel_byte(s: &str) -> String {
    s.replace('\u{1}', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshSpec;
    use crate::pipeline::{calculate_derivatives, ExampleSpec};

    fn spec(function: &str, dx: &str, dy: &str) -> ExampleSpec {
        ExampleSpec {
            id: 7,
            name: "guard test".to_string(),
            description: String::new(),
            function: function.to_string(),
            analytical_dx: dx.to_string(),
            analytical_dy: dy.to_string(),
            domain: Domain {
                x_min: -1.0,
                x_max: 1.0,
                y_min: -1.0,
                y_max: 1.0,
            },
            mesh: MeshSpec { nx: 5, ny: 5 },
        }
    }

    #[test]
    fn test_strict_path_for_finite_records() {
        let example = calculate_derivatives(&spec("x^2 + y^2", "2*x", "2*y")).unwrap();
        let bytes = to_json_safe(&example).unwrap();
        // strict JSON parses back cleanly
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["mesh"]["nx"], 5);
        assert_eq!(value["plot_data"]["x_vector"][0], -1.0);
        assert_eq!(
            value["plot_data"]["z"][0][0],
            example.z[[0, 0]]
        );
        assert!(value["validation"]["df_dx"]["rmse"].is_number());
    }

    #[test]
    fn test_lenient_path_emits_bare_tokens() {
        // 1/x is singular on the x = 0 column, so the record carries
        // infinities and NaN validation aggregates
        let example = calculate_derivatives(&spec("1/x", "-1/x^2", "0*x")).unwrap();
        let bytes = to_json_safe(&example).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("Infinity") || text.contains("NaN"));
        // no sentinel leftovers
        assert!(!text.contains("\\u0001"));
        // strict parsers reject the permissive dialect
        assert!(serde_json::from_str::<serde_json::Value>(&text).is_err());
    }

    #[test]
    fn test_sentinel_bytes_in_user_text_cannot_forge_tokens() {
        // a description containing the literal sentinel byte sequence must
        // come out as an ordinary JSON string, not a bare NaN token
        let mut spec = spec("1/x", "-1/x^2", "0*x");
        spec.description = "\u{1}NaN\u{1}".to_string();
        let example = calculate_derivatives(&spec).unwrap();
        let text = String::from_utf8(to_json_safe(&example).unwrap()).unwrap();
        assert!(text.contains("\"description\":\"NaN\""));
        assert!(!text.contains("\"description\":NaN"));
    }

    #[test]
    fn test_lenient_path_keeps_finite_values_intact() {
        let example = calculate_derivatives(&spec("1/x", "-1/x^2", "0*x")).unwrap();
        let text = String::from_utf8(to_json_safe(&example).unwrap()).unwrap();
        // the finite corner of the grid survives verbatim
        assert!(text.contains("\"x_vector\":[-1.0,-0.5,0.0,0.5,1.0]"));
    }
}
