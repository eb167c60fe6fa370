//! End-to-end flattening tests against project fixtures.

use flatcut::timecode::{TICKS_PER_SECOND, ticks_to_timecode};
use flatcut::{ClipType, Error, FlattenConfig, Project, Row, StockProvider, TrackKind};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> String {
    format!("{}/{}", FIXTURES_DIR, name)
}

fn open(name: &str) -> Project {
    Project::open(fixture_path(name)).expect("Failed to open fixture")
}

fn summary(rows: &[Row]) -> Vec<(TrackKind, u32, &str, u64, u64)> {
    rows.iter()
        .map(|r| {
            (
                r.kind,
                r.track,
                r.name.as_str(),
                r.start_ticks / TICKS_PER_SECOND,
                r.end_ticks / TICKS_PER_SECOND,
            )
        })
        .collect()
}

// ============================================================================
// Grouped Track Layout
// ============================================================================

#[test]
fn test_sequence_names() {
    let project = open("grouped.xml");
    assert_eq!(project.sequence_names(), vec!["B-Roll Nest", "Main"]);
}

#[test]
fn test_flatten_expands_nested_sequence() {
    let project = open("grouped.xml");
    let rows = project
        .flatten("Main", &FlattenConfig::default())
        .unwrap()
        .expect("Main exists");

    assert_eq!(
        summary(&rows),
        vec![
            (TrackKind::Video, 0, "Drone_Harbour.mov", 0, 5),
            (TrackKind::Video, 0, "Imago_12345678", 5, 8),
            (TrackKind::Video, 0, "City Aerial 1234567", 8, 11),
            (TrackKind::Video, 1, "logo.png", 2, 4),
            (TrackKind::Audio, 0, "Artlist_Music_Sunrise_ID-123456.wav", 0, 20),
        ]
    );

    assert_eq!(rows[1].source, Some(StockProvider::Imago));
    assert_eq!(rows[3].clip_type, ClipType::Image);
    assert_eq!(rows[4].clip_type, ClipType::Audio);
    assert_eq!(rows[4].source, Some(StockProvider::Artlist));
}

#[test]
fn test_rows_are_well_formed() {
    let project = open("grouped.xml");
    let config = FlattenConfig::default().with_include_parent_row(true);
    let rows = project.flatten("Main", &config).unwrap().unwrap();

    assert!(rows.iter().all(|r| r.start_ticks <= r.end_ticks));

    // Video rows always come before audio rows.
    let first_audio = rows.iter().position(|r| r.kind == TrackKind::Audio).unwrap();
    assert!(rows[first_audio..].iter().all(|r| r.kind == TrackKind::Audio));
}

#[test]
fn test_include_parent_row() {
    let project = open("grouped.xml");
    let config = FlattenConfig::default().with_include_parent_row(true);
    let rows = project.flatten("Main", &config).unwrap().unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Drone_Harbour.mov",
            "B-Roll Nest",
            "Imago_12345678",
            "City Aerial 1234567",
            "logo.png",
            "Artlist_Music_Sunrise_ID-123456.wav",
        ]
    );
}

/// Flattening without expansion, then splicing in the separately flattened
/// nested sequence shifted by the parent's start, gives the expanded result.
#[test]
fn test_offset_composition() {
    let project = open("grouped.xml");

    let expanded = project.flatten("Main", &FlattenConfig::default()).unwrap().unwrap();
    let shallow = project
        .flatten("Main", &FlattenConfig::default().with_expand_nested(false))
        .unwrap()
        .unwrap();
    let nested = project
        .flatten("B-Roll Nest", &FlattenConfig::default())
        .unwrap()
        .unwrap();

    let mut composed = Vec::new();
    for row in shallow {
        if row.name == "B-Roll Nest" {
            composed.extend(nested.iter().map(|n| Row {
                track: row.track,
                start_ticks: n.start_ticks + row.start_ticks,
                end_ticks: n.end_ticks + row.start_ticks,
                ..n.clone()
            }));
        } else {
            composed.push(row);
        }
    }

    assert_eq!(composed, expanded);
}

#[test]
fn test_unknown_sequence() {
    let project = open("grouped.xml");
    assert_eq!(project.flatten("Missing", &FlattenConfig::default()).unwrap(), None);
}

// ============================================================================
// Structural Edge Cases
// ============================================================================

#[test]
fn test_nesting_cycle_is_an_error() {
    let project = open("cycle.xml");
    let err = project.flatten("A", &FlattenConfig::default()).unwrap_err();
    assert!(matches!(err, Error::NestingCycle { ref sequence } if sequence == "A"));
    assert!(err.to_string().contains("cycle"));

    let shallow = FlattenConfig::default().with_expand_nested(false);
    let rows = project.flatten("A", &shallow).unwrap().unwrap();
    assert_eq!(summary(&rows), vec![(TrackKind::Video, 0, "B", 0, 1)]);
}

#[test]
fn test_nesting_by_sequence_id_value() {
    let project = open("id_nested.xml");
    let rows = project.flatten("Edit", &FlattenConfig::default()).unwrap().unwrap();
    assert_eq!(summary(&rows), vec![(TrackKind::Video, 0, "Harbour_Gulls.mov", 1, 2)]);

    let config = FlattenConfig::default().with_include_parent_row(true);
    let rows = project.flatten("Edit", &config).unwrap().unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Cutaways", "Harbour_Gulls.mov"]);
}

#[test]
fn test_clip_named_after_its_sequence() {
    let project = Project::from_bytes(
        br#"<PremiereData>
            <Sequence ObjectUID="seq"><Name>A001.mov</Name>
                <VideoTrack>
                    <TrackItem><Start>0</Start><End>254016000000</End><SubClip ObjectRef="1"/></TrackItem>
                </VideoTrack>
            </Sequence>
            <SubClip ObjectID="1"><Name>A001.mov</Name></SubClip>
        </PremiereData>"#,
    )
    .unwrap();

    let rows = project.flatten("A001.mov", &FlattenConfig::default()).unwrap().unwrap();
    assert_eq!(summary(&rows), vec![(TrackKind::Video, 0, "A001.mov", 0, 1)]);
}

#[test]
fn test_empty_nested_sequence_keeps_parent() {
    let project = Project::from_bytes(
        br#"<PremiereData>
            <Sequence ObjectUID="outer"><Name>Outer</Name>
                <VideoTrack Index="2">
                    <TrackItem><Start>10</Start><End>20</End><SubClip ObjectURef="inner"/></TrackItem>
                </VideoTrack>
            </Sequence>
            <Sequence ObjectUID="inner"><Name>Inner</Name><TrackGroups/></Sequence>
        </PremiereData>"#,
    )
    .unwrap();

    for include_parent in [false, true] {
        let config = FlattenConfig::default().with_include_parent_row(include_parent);
        let rows = project.flatten("Outer", &config).unwrap().unwrap();
        assert_eq!(rows.len(), 1, "include_parent = {include_parent}");
        assert_eq!(rows[0].name, "Inner");
        assert_eq!(rows[0].track, 2);
        assert_eq!((rows[0].start_ticks, rows[0].end_ticks), (10, 20));
    }
}

#[test]
fn test_single_stock_clip() {
    let project = Project::from_bytes(
        br#"<PremiereData>
            <Sequence ObjectUID="main"><Name>Main</Name>
                <VideoTrack>
                    <TrackItem><Name>Artlist_123456_Song.wav</Name><Start>0</Start><End>254016000000</End></TrackItem>
                </VideoTrack>
            </Sequence>
        </PremiereData>"#,
    )
    .unwrap();

    let rows = project.flatten("Main", &FlattenConfig::default()).unwrap().unwrap();
    assert_eq!(
        rows,
        vec![Row {
            kind: TrackKind::Video,
            track: 0,
            name: "Artlist_123456_Song.wav".to_string(),
            clip_type: ClipType::Video,
            source: Some(StockProvider::Artlist),
            start_ticks: 0,
            end_ticks: TICKS_PER_SECOND,
        }]
    );
    assert_eq!(ticks_to_timecode(rows[0].end_ticks), "00:00:01");
}
