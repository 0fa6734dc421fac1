//! Round trips through the text format and the filesystem.

use std::fs;
use std::path::PathBuf;

use coulomb_core::{DVec3, ParticleParams};
use coulomb_format::{files, read_document, write_document, Document, FieldsRecord, FormatError, SimulationHeader};
use proptest::prelude::*;

fn arb_finite() -> impl Strategy<Value = f64> {
    prop_oneof![-1e6f64..1e6, -1e-9f64..1e-9, Just(0.0)]
}

fn arb_vec() -> impl Strategy<Value = DVec3> {
    (arb_finite(), arb_finite(), arb_finite()).prop_map(|(x, y, z)| DVec3::new(x, y, z))
}

fn arb_params() -> impl Strategy<Value = ParticleParams> {
    (
        1e-12f64..1e12,
        prop_oneof![-1e3f64..-1e-12, 1e-12f64..1e3],
        arb_vec(),
        arb_vec(),
        any::<bool>(),
    )
        .prop_map(|(m, q, r, v, s)| ParticleParams::new(m, q, r, v).stationary(s))
}

fn arb_document() -> impl Strategy<Value = Document> {
    (
        1e-3f64..1e4,
        1e-6f64..1.0,
        any::<bool>(),
        arb_vec(),
        arb_vec(),
        prop::collection::vec(arb_params(), 1..12),
    )
        .prop_map(|(time, precision, interactions, electric, magnetic, particles)| Document {
            header: SimulationHeader {
                time,
                precision,
                interactions,
            },
            fields: FieldsRecord { electric, magnetic },
            particles,
        })
}

proptest! {
    #[test]
    fn text_round_trip_is_exact(doc in arb_document()) {
        let mut buf = Vec::new();
        write_document(&mut buf, &doc).unwrap();
        let back = read_document(buf.as_slice()).unwrap();
        prop_assert_eq!(back, doc);
    }
}

/// Fresh, empty directory under the system temp dir.
fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("coulomb-format-{test}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample() -> Document {
    Document {
        header: SimulationHeader {
            time: 1.0,
            precision: 0.1,
            interactions: true,
        },
        fields: FieldsRecord {
            electric: DVec3::new(1.0, 2.0, 0.0),
            magnetic: DVec3::new(0.0, 0.0, 3.0),
        },
        particles: vec![
            ParticleParams::new(1.0, 1.0, DVec3::new(-1.0, 0.0, 0.0), DVec3::ZERO),
            ParticleParams::new(1.0, -1.0, DVec3::new(1.0, 0.0, 0.0), DVec3::ZERO),
        ],
    }
}

#[test]
fn save_then_load() {
    let dir = scratch_dir("save-load");
    let path = files::save(&dir, "dipole.txt", &sample()).unwrap();
    assert_eq!(path, dir.join("dipole.txt"));
    assert_eq!(files::load(&dir, "dipole.txt").unwrap(), sample());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn save_never_overwrites() {
    let dir = scratch_dir("no-clobber");
    fs::write(dir.join("taken.txt"), "keep me").unwrap();
    let path = files::save(&dir, "taken.txt", &sample()).unwrap();
    assert_ne!(path, dir.join("taken.txt"));
    assert_eq!(fs::read_to_string(dir.join("taken.txt")).unwrap(), "keep me");
    assert_eq!(files::load(&dir, path.file_name().unwrap().to_str().unwrap()).unwrap(), sample());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn repeated_fallback_saves_keep_every_file() {
    let dir = scratch_dir("repeat-fallback");
    fs::write(dir.join("taken.txt"), "keep me").unwrap();
    let paths: Vec<_> = (0..3)
        .map(|_| files::save(&dir, "taken.txt", &sample()).unwrap())
        .collect();
    // Same-second saves must land in distinct files.
    assert_ne!(paths[0], paths[1]);
    assert_ne!(paths[1], paths[2]);
    assert_ne!(paths[0], paths[2]);
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 4);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn load_missing_file() {
    let dir = scratch_dir("missing");
    assert!(matches!(
        files::load(&dir, "nope.txt"),
        Err(FormatError::FileNotFound { .. })
    ));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn load_spaced_lists() {
    let dir = scratch_dir("spaced-lists");
    fs::write(
        dir.join("legacy.txt"),
        "SIMULATION T:10.0 P:0.01 I:1\n\
         FIELD E:[0.0, 0.0, 0.0] M:[0.0, 0.0, 0.0]\n\
         PARTICLE M:1.0 C:1e-05 R:[1.0, 2.0, 0.0] V:[0.0, 0.0, 0.0] S:0\n",
    )
    .unwrap();
    let doc = files::load(&dir, "legacy.txt").unwrap();
    assert_eq!(doc.particles[0].charge, 1e-5);
    assert_eq!(doc.particles[0].position, DVec3::new(1.0, 2.0, 0.0));
    fs::remove_dir_all(&dir).unwrap();
}
