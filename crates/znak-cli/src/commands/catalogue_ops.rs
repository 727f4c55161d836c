use std::path::Path;

use tracing::info;
use znak_core::catalogue::{compile_snapshot, open_catalogue, MemoryCatalogue};
use znak_core::geometry::{encode_run_length, rasterize, Ellipse, RasterError};
use znak_core::sign::Placement;

use crate::CliError;

/// Compile the catalogue at `db` into a ZNCT snapshot for the given canvas.
pub fn run_compile(
    db: &Path,
    output: &Path,
    width: usize,
    height: usize,
) -> Result<MemoryCatalogue, CliError> {
    let source = open_catalogue(db)?;
    let compiled = compile_snapshot(source.as_ref(), width, height)?;
    compiled.save(output)?;
    info!(
        signs = compiled.signs().len(),
        output = %output.display(),
        "snapshot written"
    );
    Ok(compiled)
}

pub fn compile(db: &Path, output: &Path) {
    let canvas = &znak_core::settings::settings().canvas;
    let compiled = die!(
        run_compile(db, output, canvas.width, canvas.height),
        "Error compiling catalogue: {}"
    );
    let encoded = compiled
        .signs()
        .iter()
        .filter(|s| matches!(s.placement, Some(Placement::RunLength(_))))
        .count();
    let ellipses = compiled
        .signs()
        .iter()
        .filter(|s| matches!(s.placement, Some(Placement::Ellipse(_))))
        .count();
    eprintln!(
        "Wrote {}: {} signs ({encoded} run-length, {ellipses} ellipse), {} translations",
        output.display(),
        compiled.signs().len(),
        compiled.translations().len()
    );
}

/// Run-length encoding of `ellipse` on a `width × height` canvas.
pub fn run_rasterize(
    ellipse: &str,
    width: usize,
    height: usize,
) -> Result<(u32, String), RasterError> {
    let ellipse: Ellipse = ellipse.parse()?;
    let raster = rasterize(&ellipse, width, height);
    Ok((raster.area(), encode_run_length(&raster)?))
}

pub fn rasterize_cmd(ellipse: &str, outline: Option<usize>) {
    let canvas = &znak_core::settings::settings().canvas;
    if let Some(steps) = outline {
        let parsed: Ellipse = die!(ellipse.parse::<Ellipse>(), "Error: {}");
        for p in parsed.outline(steps) {
            println!("{:.1},{:.1}", p.x, p.y);
        }
        return;
    }
    let (area, encoded) = die!(
        run_rasterize(ellipse, canvas.width, canvas.height),
        "Error: {}"
    );
    eprintln!("area: {area} cells on {}x{}", canvas.width, canvas.height);
    println!("{encoded}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use znak_core::catalogue::Catalogue;
    use znak_core::geometry::decode_run_length;

    #[test]
    fn rasterize_prints_decodable_encoding() {
        let (area, encoded) = run_rasterize("50,40,10,6,0.3", 120, 100).unwrap();
        let decoded = decode_run_length(&encoded, 120, 100).unwrap();
        assert_eq!(decoded.area(), area);
        assert!(area > 0);
    }

    #[test]
    fn rasterize_degenerate_is_empty() {
        assert_eq!(
            run_rasterize("50,40,0,6,0", 120, 100).unwrap(),
            (0, String::new())
        );
    }

    #[test]
    fn rasterize_rejects_bad_text() {
        assert!(matches!(
            run_rasterize("50,40", 120, 100),
            Err(RasterError::Parse(_))
        ));
    }

    #[test]
    fn compile_resaves_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.zncat");
        MemoryCatalogue::new(vec![], vec![], vec!["slovo".to_string()])
            .save(&src)
            .unwrap();
        let out = dir.path().join("out.zncat");

        run_compile(&src, &out, 240, 250).unwrap();
        let loaded = MemoryCatalogue::open(&out).unwrap();
        assert_eq!(loaded.load_all_words().unwrap(), vec!["slovo".to_string()]);
    }
}
