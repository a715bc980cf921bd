//! OBJ geometry loader: positions and normals, fan-triangulated into a flat
//! interleaved triangle list.
//!
//! Only `v`, `vn` and `f` are interpreted; every other directive is ignored.
//! Malformed declarations, corners and faces are skipped and the parse keeps
//! going, so a damaged file yields a shorter mesh rather than an error. The
//! only hard failure is a stream that cannot be read.
//!
//! Negative (end-relative) indices resolve against the number of elements
//! declared *before* the face line, i.e. the running count at the point of
//! reference.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::mesh::{MeshData, MeshVertex};

/// Why a piece of input was skipped (or merely not understood).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ObjIssue {
    #[error("`{tag}` declaration needs three numeric components")]
    IncompleteVector { tag: &'static str },
    #[error("face has {corners} corner(s), at least 3 required")]
    DegenerateFace { corners: usize },
    #[error("malformed face corner '{token}'")]
    MalformedCorner { token: String },
    #[error("position index {index} out of range (declared so far: {len})")]
    PositionOutOfRange { index: i64, len: usize },
    #[error("face dropped: anchor corner is invalid")]
    DroppedFace,
    #[error("triangle {corners:?} dropped: corner is invalid")]
    DroppedTriangle { corners: [usize; 3] },
    #[error("unsupported directive '{tag}' ignored")]
    UnsupportedDirective { tag: String },
}

impl ObjIssue {
    /// `true` when the issue caused input to be dropped.
    pub fn is_skip(&self) -> bool {
        !matches!(self, ObjIssue::UnsupportedDirective { .. })
    }
}

/// Hook for diagnostics. Observers see every issue but cannot change what the
/// parser emits.
pub trait LoadObserver {
    fn on_issue(&mut self, _line: usize, _issue: &ObjIssue) {}
}

/// Silent observer.
impl LoadObserver for () {}

impl<O: LoadObserver + ?Sized> LoadObserver for &mut O {
    fn on_issue(&mut self, line: usize, issue: &ObjIssue) {
        (**self).on_issue(line, issue);
    }
}

impl<A: LoadObserver, B: LoadObserver> LoadObserver for (A, B) {
    fn on_issue(&mut self, line: usize, issue: &ObjIssue) {
        self.0.on_issue(line, issue);
        self.1.on_issue(line, issue);
    }
}

/// Logs every issue through `log`, tagged with a source name.
#[derive(Clone, Copy, Debug)]
pub struct LogObserver<'a> {
    pub source: &'a str,
}

impl LoadObserver for LogObserver<'_> {
    fn on_issue(&mut self, line: usize, issue: &ObjIssue) {
        if issue.is_skip() {
            log::debug!("{}:{}: {}", self.source, line, issue);
        } else {
            log::trace!("{}:{}: {}", self.source, line, issue);
        }
    }
}

/// Per-kind issue counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub incomplete_vectors: usize,
    pub degenerate_faces: usize,
    pub malformed_corners: usize,
    pub out_of_range_positions: usize,
    pub dropped_faces: usize,
    pub dropped_triangles: usize,
    pub unsupported_directives: usize,
}

impl LoadReport {
    /// Declarations, faces and triangles that were dropped.
    pub fn skipped(&self) -> usize {
        self.incomplete_vectors + self.degenerate_faces + self.dropped_faces + self.dropped_triangles
    }

    pub fn is_clean(&self) -> bool {
        self.skipped() == 0
    }
}

impl LoadObserver for LoadReport {
    fn on_issue(&mut self, _line: usize, issue: &ObjIssue) {
        let counter = match issue {
            ObjIssue::IncompleteVector { .. } => &mut self.incomplete_vectors,
            ObjIssue::DegenerateFace { .. } => &mut self.degenerate_faces,
            ObjIssue::MalformedCorner { .. } => &mut self.malformed_corners,
            ObjIssue::PositionOutOfRange { .. } => &mut self.out_of_range_positions,
            ObjIssue::DroppedFace => &mut self.dropped_faces,
            ObjIssue::DroppedTriangle { .. } => &mut self.dropped_triangles,
            ObjIssue::UnsupportedDirective { .. } => &mut self.unsupported_directives,
        };
        *counter += 1;
    }
}

/// Load an OBJ mesh from a file path, logging skipped input at `debug`.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open OBJ file: {}", path.display()))?;

    let source = path.display().to_string();
    let mut report = LoadReport::default();
    let mesh = load_obj_with(
        BufReader::new(file),
        (LogObserver { source: &source }, &mut report),
    )
    .with_context(|| format!("Failed to read OBJ file: {}", path.display()))?;

    log::info!(
        "Loaded OBJ {}: {} triangles, {} skipped element(s)",
        source,
        mesh.triangle_count(),
        report.skipped()
    );
    Ok(mesh)
}

/// Like [`load_obj_from_path`], but an unreadable file degrades to an empty
/// mesh and a warning.
pub fn load_obj_or_empty(path: impl AsRef<Path>) -> MeshData {
    match load_obj_from_path(path) {
        Ok(mesh) => mesh,
        Err(err) => {
            log::warn!("{err:#}");
            MeshData::empty()
        }
    }
}

/// Load an OBJ mesh from a [`BufRead`] implementation, silently skipping bad
/// input.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> Result<MeshData> {
    load_obj_with(reader, ())
}

/// Load an OBJ mesh, reporting every skipped element to `observer`.
pub fn load_obj_with<R: BufRead, O: LoadObserver>(reader: R, observer: O) -> Result<MeshData> {
    parse_obj(reader, observer)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> MeshData {
    // Reading from memory cannot fail.
    parse_obj(io::Cursor::new(contents), ()).unwrap_or_default()
}

/// Fan triangulation of a polygon with `corner_count` corners: `[0, i, i + 1]`
/// for `i` in `1..corner_count - 1`. Yields nothing below three corners.
pub fn fan_triangles(corner_count: usize) -> impl Iterator<Item = [usize; 3]> + Clone {
    (1..corner_count.saturating_sub(1)).map(|i| [0, i, i + 1])
}

/// Directives that are valid OBJ but carry nothing this loader emits.
const IGNORED_DIRECTIVES: &[&str] = &[
    "vt", "vp", "o", "g", "s", "l", "p", "mtllib", "usemtl",
];

/// A face corner whose indices have been resolved to 0-based table slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Corner {
    position: usize,
    normal: Option<usize>,
}

struct ObjParser<O> {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    vertices: Vec<MeshVertex>,
    observer: O,
}

fn parse_obj<R: BufRead, O: LoadObserver>(mut reader: R, observer: O) -> Result<MeshData> {
    let mut parser = ObjParser {
        positions: Vec::new(),
        normals: Vec::new(),
        vertices: Vec::new(),
        observer,
    };

    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("Failed to read line {}", line_no + 1))?;
        if read == 0 {
            break;
        }
        let decoded = String::from_utf8_lossy(&buf);
        let mut text: &str = &decoded;
        text = text.strip_suffix('\n').unwrap_or(text);
        text = text.strip_suffix('\r').unwrap_or(text);
        // A lone `\r` ends a line too (classic Mac line endings).
        for segment in text.split('\r') {
            line_no += 1;
            parser.line(line_no, segment);
        }
    }

    Ok(MeshData::new(parser.vertices))
}

impl<O: LoadObserver> ObjParser<O> {
    fn line(&mut self, line_no: usize, raw: &str) {
        let content = match raw.find('#') {
            Some(at) => &raw[..at],
            None => raw,
        };
        let mut parts = content.split_whitespace();
        let Some(tag) = parts.next() else {
            return;
        };

        match tag {
            "v" => match parse_vec3(parts) {
                Some(p) => self.positions.push(p),
                None => self.issue(line_no, ObjIssue::IncompleteVector { tag: "v" }),
            },
            "vn" => match parse_vec3(parts) {
                Some(n) => self.normals.push(n),
                None => self.issue(line_no, ObjIssue::IncompleteVector { tag: "vn" }),
            },
            "f" => {
                let tokens: Vec<&str> = parts.collect();
                self.face(line_no, &tokens);
            }
            tag if IGNORED_DIRECTIVES.contains(&tag) => {}
            other => self.issue(
                line_no,
                ObjIssue::UnsupportedDirective {
                    tag: other.to_owned(),
                },
            ),
        }
    }

    fn face(&mut self, line_no: usize, tokens: &[&str]) {
        if tokens.len() < 3 {
            self.issue(
                line_no,
                ObjIssue::DegenerateFace {
                    corners: tokens.len(),
                },
            );
            return;
        }

        // Resolved once per face, against the tables as they stand now.
        let (pos_count, norm_count) = (self.positions.len(), self.normals.len());
        let mut corners: Vec<Option<Corner>> = Vec::with_capacity(tokens.len());
        for token in tokens {
            match resolve_corner(token, pos_count, norm_count) {
                Ok(corner) => corners.push(Some(corner)),
                Err(issue) => {
                    self.issue(line_no, issue);
                    corners.push(None);
                }
            }
        }

        let Some(anchor) = corners[0] else {
            self.issue(line_no, ObjIssue::DroppedFace);
            return;
        };

        for tri in fan_triangles(corners.len()) {
            match (corners[tri[1]], corners[tri[2]]) {
                (Some(b), Some(c)) => {
                    for corner in [anchor, b, c] {
                        let vertex = self.vertex(corner);
                        self.vertices.push(vertex);
                    }
                }
                _ => self.issue(line_no, ObjIssue::DroppedTriangle { corners: tri }),
            }
        }
    }

    fn vertex(&self, corner: Corner) -> MeshVertex {
        let normal = corner
            .normal
            .and_then(|i| self.normals.get(i).copied())
            .unwrap_or([0.0; 3]);
        MeshVertex::new(self.positions[corner.position], normal)
    }

    fn issue(&mut self, line_no: usize, issue: ObjIssue) {
        self.observer.on_issue(line_no, &issue);
    }
}

fn parse_vec3<'a>(mut parts: impl Iterator<Item = &'a str>) -> Option<[f32; 3]> {
    let mut next = || parts.next()?.parse::<f32>().ok();
    Some([next()?, next()?, next()?])
}

/// Resolve `P`, `P/T`, `P/T/N` or `P//N`. The texture slot is skipped
/// without being validated.
fn resolve_corner(token: &str, pos_count: usize, norm_count: usize) -> Result<Corner, ObjIssue> {
    let malformed = || ObjIssue::MalformedCorner {
        token: token.to_owned(),
    };

    let mut split = token.split('/');
    let raw_pos = split
        .next()
        .and_then(|p| p.parse::<i64>().ok())
        .ok_or_else(malformed)?;
    let position = resolve_index(raw_pos, pos_count).ok_or(ObjIssue::PositionOutOfRange {
        index: raw_pos,
        len: pos_count,
    })?;

    let _texcoord = split.next();
    let normal = match split.next() {
        Some(value) if !value.is_empty() => {
            let raw = value.parse::<i64>().map_err(|_| malformed())?;
            resolve_index(raw, norm_count)
        }
        _ => None,
    };

    Ok(Corner { position, normal })
}

/// 1-based positive or end-relative negative index to a 0-based slot in a
/// table of `len` elements. Zero and anything outside the table is `None`.
fn resolve_index(raw: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let idx = match raw {
        0 => return None,
        k if k > 0 => k - 1,
        k => len + k,
    };
    if (0..len).contains(&idx) {
        usize::try_from(idx).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    const TRIANGLE: &str = "
        v 0.0 0.0 0.0
        v 1.0 0.0 0.0
        v 0.0 1.0 0.0
        f 1 2 3
    ";

    fn positions(mesh: &MeshData) -> Vec<[f32; 3]> {
        mesh.vertices.iter().map(|v| v.position).collect()
    }

    fn report_for(src: &str) -> (MeshData, LoadReport) {
        let mut report = LoadReport::default();
        let mesh = load_obj_with(io::Cursor::new(src), &mut report).expect("in-memory read");
        (mesh, report)
    }

    #[test]
    fn empty_input_yields_no_triangles() {
        let mesh = load_obj_from_str("");
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn parse_simple_triangle() {
        let mesh = load_obj_from_str(TRIANGLE);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(
            positions(&mesh),
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
        );
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0; 3]));
        assert_eq!(mesh.as_floats().len(), 18);
    }

    #[test]
    fn quad_is_fan_triangulated_around_first_corner() {
        let mesh = load_obj_from_str(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        );
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(
            positions(&mesh),
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ]
        );
    }

    #[test]
    fn negative_indices_match_positive_ones() {
        let absolute = load_obj_from_str(TRIANGLE);
        let relative = load_obj_from_str(&TRIANGLE.replace("f 1 2 3", "f -3 -2 -1"));
        assert_eq!(absolute, relative);
    }

    #[test]
    fn negative_indices_use_running_count_at_face() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 0 1 0
            f -3 -2 -1
            v 5 5 5
            v 6 6 6
            v 7 7 7
            f -3 -2 -1
        ";
        let mesh = load_obj_from_str(src);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(&positions(&mesh)[..3], &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        assert_eq!(&positions(&mesh)[3..], &[[5.0, 5.0, 5.0], [6.0, 6.0, 6.0], [7.0, 7.0, 7.0]]);
    }

    #[test]
    fn positions_declared_after_a_face_are_not_visible_to_it() {
        let (mesh, report) = report_for("v 0 0 0\nv 1 0 0\nf 1 2 3\nv 0 1 0\n");
        assert!(mesh.is_empty());
        assert_eq!(report.out_of_range_positions, 1);
        assert_eq!(report.dropped_triangles, 1);
    }

    #[test]
    fn missing_normal_defaults_to_zero() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 0 1 0
            vn 0 0 1
            vn 0 1 0
            f 1//1 2//2 3
        ";
        let mesh = load_obj_from_str(src);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[1].normal, [0.0, 1.0, 0.0]);
        assert_eq!(mesh.vertices[2].normal, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn texcoord_slot_is_discarded() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 0 1 0
            vn 1 0 0
            f 1/1 2/7/1 3/x/-1
        ";
        let mesh = load_obj_from_str(src);
        assert_eq!(mesh.triangle_count(), 1);
        // `1/1` carries a texture index only.
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[1].normal, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[2].normal, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn out_of_range_or_zero_normal_falls_back() {
        let mesh = load_obj_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//0 2//9 3//-2\n");
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0; 3]));
    }

    #[test]
    fn invalid_anchor_drops_whole_face() {
        let (mesh, report) = report_for(&TRIANGLE.replace("f 1 2 3", "f 99 1 2"));
        assert!(mesh.is_empty());
        assert_eq!(report.dropped_faces, 1);
        assert_eq!(report.dropped_triangles, 0);

        let mesh = load_obj_from_str(&TRIANGLE.replace("f 1 2 3", "f 0 1 2"));
        assert!(mesh.is_empty());
    }

    #[test]
    fn invalid_inner_corner_drops_only_its_triangles() {
        // Pentagon fan: (1,2,3) (1,3,4) (1,4,5); corner 3 is bad.
        let src = "
            v 0 0 0
            v 1 0 0
            v 2 1 0
            v 1 2 0
            v 0 1 0
            f 1 2 abc 4 5
        ";
        let (mesh, report) = report_for(src);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(
            positions(&mesh),
            vec![[0.0, 0.0, 0.0], [1.0, 2.0, 0.0], [0.0, 1.0, 0.0]]
        );
        assert_eq!(report.malformed_corners, 1);
        assert_eq!(report.dropped_triangles, 2);
    }

    #[test]
    fn degenerate_faces_are_dropped() {
        let (mesh, report) = report_for("v 0 0 0\nv 1 0 0\nf 1 2\nf\n");
        assert!(mesh.is_empty());
        assert_eq!(report.degenerate_faces, 2);
    }

    #[test]
    fn short_or_malformed_vectors_are_skipped() {
        let src = "
            v 0 0
            v 1 nope 0
            v 0 0 0
            v 1 0 0
            v 0 1 0 1.0
            vn 0 1
            f 1 2 3
        ";
        let (mesh, report) = report_for(src);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(positions(&mesh)[2], [0.0, 1.0, 0.0]);
        assert_eq!(report.incomplete_vectors, 3);
    }

    #[test]
    fn comments_and_blank_lines_do_not_change_output() {
        let plain = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1 4//1\n";
        let noisy = "# header\n\nv 0 0 0\n   # indented comment\nv 1 0 0\n\n\t\nv 1 1 0 # trailing\nv 0 1 0\r\nvn 0 0 1\n#f 1 2 3\nf 1//1 2//1 3//1 4//1 # quad\n";
        let a = load_obj_from_str(plain);
        let b = load_obj_from_str(noisy);
        assert_eq!(a.triangle_count(), 2);
        assert_eq!(a, b);
    }

    #[test]
    fn unsupported_directives_are_ignored() {
        let src = format!(
            "mtllib scene.mtl\no thing\ng group\nvt 0 0\ns off\nusemtl red\ncstype bezier\n{TRIANGLE}"
        );
        let (mesh, report) = report_for(&src);
        assert_eq!(mesh.triangle_count(), 1);
        // Known-but-unused directives are silent; only `cstype` is reported.
        assert_eq!(report.unsupported_directives, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn bare_carriage_returns_end_lines() {
        let mesh = load_obj_from_str("v 0 0 0\rv 1 0 0\rv 0 1 0\rf 1 2 3\r");
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(positions(&mesh)[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn line_numbers_count_crlf_and_bare_cr_once() {
        struct Lines(Vec<usize>);
        impl LoadObserver for Lines {
            fn on_issue(&mut self, line: usize, _issue: &ObjIssue) {
                self.0.push(line);
            }
        }

        let mut lines = Lines(Vec::new());
        load_obj_with(io::Cursor::new("v 0 0 0\r\nv 1\rv 0 1 0\r\nf 1 2\n"), &mut lines).unwrap();
        assert_eq!(lines.0, vec![2, 4]);
    }

    #[test]
    fn texcoord_only_corners_have_no_normal() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 0 1 0
            vn 0 0 1
            f 1/1 2/2 3
        ";
        let mesh = load_obj_from_str(src);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0; 3]));
    }

    #[test]
    fn parsing_is_bit_identical_across_runs() {
        let src = "v 0.1 -2.5e-3 3\nv 1e10 0 -0\nv 0.333333 0.5 0.7\nvn 0.577 0.577 0.577\nf 1//1 2//1 3//1\n";
        let a = load_obj_from_str(src).to_interleaved();
        let b = load_obj_from_str(src).to_interleaved();
        let bits = |v: &[f32]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn invalid_utf8_line_is_skipped_not_fatal() {
        let mut src = b"v 0 0 0\nv 1 0 0\nv 0 1 0\n".to_vec();
        src.extend_from_slice(b"g \xff\xfe\n");
        src.extend_from_slice(b"f 1 2 3\n");
        let mesh = load_obj_from_reader(io::Cursor::new(src)).expect("lossy decode");
        assert_eq!(mesh.triangle_count(), 1);
    }

    struct BrokenStream;

    impl Read for BrokenStream {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device unplugged"))
        }
    }

    #[test]
    fn unreadable_stream_is_an_error() {
        let err = load_obj_from_reader(BufReader::new(BrokenStream)).unwrap_err();
        assert!(format!("{err:#}").contains("device unplugged"));
    }

    #[test]
    fn missing_file_degrades_to_empty_mesh() {
        let path = std::env::temp_dir().join("asset-obj-tests-definitely-missing.obj");
        assert!(load_obj_from_path(&path).is_err());
        assert!(load_obj_or_empty(&path).is_empty());
    }

    #[test]
    fn observer_sees_line_numbers() {
        struct Lines(Vec<usize>);
        impl LoadObserver for Lines {
            fn on_issue(&mut self, line: usize, issue: &ObjIssue) {
                if issue.is_skip() {
                    self.0.push(line);
                }
            }
        }

        let mut lines = Lines(Vec::new());
        load_obj_with(io::Cursor::new("v 0 0 0\n\nv 1\nf 1 2\n"), &mut lines).unwrap();
        assert_eq!(lines.0, vec![3, 4]);
    }

    fn bundled(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../assets/models")
            .join(name)
    }

    #[test]
    fn bundled_cube_has_twelve_lit_triangles() {
        let mesh = load_obj_from_path(bundled("cube.obj")).expect("cube.obj");
        assert_eq!(mesh.triangle_count(), 12);
        for v in &mesh.vertices {
            let len: f32 = v.normal.iter().map(|c| c * c).sum();
            assert!((len - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn bundled_octahedron_resolves_relative_indices() {
        let mut report = LoadReport::default();
        let file = File::open(bundled("octahedron.obj")).expect("octahedron.obj");
        let mesh = load_obj_with(BufReader::new(file), &mut report).unwrap();
        assert_eq!(mesh.triangle_count(), 8);
        assert!(report.is_clean());
        // First face is v1 v3 v5 with the (+,+,+) normal.
        assert_eq!(mesh.vertices[0].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[1].position, [0.0, 1.0, 0.0]);
        assert_eq!(mesh.vertices[2].position, [0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[0].normal, [0.577, 0.577, 0.577]);
    }

    #[test]
    fn bundled_ground_ignores_texcoords() {
        let mesh = load_obj_from_path(bundled("ground.obj")).expect("ground.obj");
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn fan_triangles_cover_polygon() {
        assert_eq!(fan_triangles(2).count(), 0);
        assert_eq!(fan_triangles(3).collect::<Vec<_>>(), vec![[0, 1, 2]]);
        let hex = fan_triangles(6);
        assert_eq!(hex.clone().count(), 4);
        assert_eq!(hex.last(), Some([0, 4, 5]));
    }

    #[test]
    fn resolve_index_rules() {
        assert_eq!(resolve_index(1, 3), Some(0));
        assert_eq!(resolve_index(3, 3), Some(2));
        assert_eq!(resolve_index(4, 3), None);
        assert_eq!(resolve_index(-1, 3), Some(2));
        assert_eq!(resolve_index(-3, 3), Some(0));
        assert_eq!(resolve_index(-4, 3), None);
        assert_eq!(resolve_index(0, 3), None);
        assert_eq!(resolve_index(1, 0), None);
    }

    #[test]
    fn issues_render_readable_messages() {
        let msg = ObjIssue::PositionOutOfRange { index: 99, len: 3 }.to_string();
        assert_eq!(msg, "position index 99 out of range (declared so far: 3)");
        let msg = ObjIssue::DroppedTriangle { corners: [0, 2, 3] }.to_string();
        assert_eq!(msg, "triangle [0, 2, 3] dropped: corner is invalid");
    }
}
