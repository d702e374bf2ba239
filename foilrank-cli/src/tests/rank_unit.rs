//! Focused unit tests covering rank configuration and report output.

use super::helpers::{NORMALISED_LIFT, PolarWorkspace, write_utf8};
use super::*;
use crate::rank::{OutputFormat, RankArgs, RankConfig, config_from_layers_for_test, run_rank_with};
use camino::Utf8PathBuf;
use foilrank_data::{CandidateFilter, NcritSelection};
use rstest::rstest;
use serde_json::Value;

fn complete_args() -> RankArgs {
    RankArgs {
        polar_dir: Some(Utf8PathBuf::from("polars")),
        reference: Some(Utf8PathBuf::from("polars/reference_R_50000_N_9.csv")),
        formula: Some("average(norm(cl/cd))".to_owned()),
        ..RankArgs::default()
    }
}

fn config_error(args: RankArgs) -> CliError {
    RankConfig::try_from(args).expect_err("configuration should be rejected")
}

#[rstest]
#[case::polar_dir(ARG_POLAR_DIR, ENV_POLAR_DIR)]
#[case::reference(ARG_REFERENCE, ENV_REFERENCE)]
#[case::formula(ARG_FORMULA, ENV_FORMULA)]
fn converting_without_required_fields_errors(
    #[case] expected_field: &'static str,
    #[case] expected_env: &'static str,
) {
    let mut args = complete_args();
    match expected_field {
        ARG_POLAR_DIR => args.polar_dir = None,
        ARG_REFERENCE => args.reference = None,
        _ => args.formula = None,
    }
    match config_error(args) {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, expected_field);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn converting_applies_defaults() {
    let config = RankConfig::try_from(complete_args()).expect("config should build");
    assert_eq!(config.filter, CandidateFilter::default());
    assert_eq!(config.top, 5);
    assert_eq!(config.format, OutputFormat::Text);
}

#[rstest]
fn converting_builds_the_candidate_filter() {
    let args = RankArgs {
        ncrit: Some(5),
        reynolds_min: Some(100_000),
        reynolds_max: Some(200_000),
        thickness_min: Some(8.0),
        thickness_max: Some(14.0),
        camber_max: Some(3.0),
        top: Some(10),
        format: Some(OutputFormat::Json),
        ..complete_args()
    };
    let config = RankConfig::try_from(args).expect("config should build");
    assert_eq!(
        config.filter,
        CandidateFilter {
            reynolds: 100_000..=200_000,
            ncrit: NcritSelection::Exactly(5),
            thickness: 8.0..=14.0,
            camber: 0.0..=3.0,
        }
    );
    assert_eq!(config.top, 10);
    assert_eq!(config.format, OutputFormat::Json);
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(12)]
fn converting_rejects_unpublished_ncrit(#[case] ncrit: u8) {
    let args = RankArgs {
        ncrit: Some(ncrit),
        ..complete_args()
    };
    match config_error(args) {
        CliError::UnsupportedNcrit { value } => assert_eq!(value, ncrit),
        other => panic!("expected UnsupportedNcrit, found {other:?}"),
    }
}

#[rstest]
fn converting_rejects_inverted_reynolds_bounds() {
    let args = RankArgs {
        reynolds_min: Some(500_000),
        reynolds_max: Some(100_000),
        ..complete_args()
    };
    match config_error(args) {
        CliError::InvertedReynoldsRange { min, max } => {
            assert_eq!((min, max), (500_000, 100_000));
        }
        other => panic!("expected InvertedReynoldsRange, found {other:?}"),
    }
}

#[rstest]
fn converting_rejects_reynolds_bounds_without_data() {
    let args = RankArgs {
        reynolds_min: Some(600_000),
        reynolds_max: Some(900_000),
        ..complete_args()
    };
    match config_error(args) {
        CliError::NoAvailableReynolds { min, max } => {
            assert_eq!((min, max), (600_000, 900_000));
        }
        other => panic!("expected NoAvailableReynolds, found {other:?}"),
    }
}

#[rstest]
#[case::thickness("thickness")]
#[case::camber("camber")]
fn converting_rejects_inverted_geometry_bounds(#[case] expected: &'static str) {
    let mut args = complete_args();
    if expected == "thickness" {
        args.thickness_min = Some(20.0);
        args.thickness_max = Some(10.0);
    } else {
        args.camber_min = Some(20.0);
        args.camber_max = Some(10.0);
    }
    match config_error(args) {
        CliError::InvertedRange { field, .. } => assert_eq!(field, expected),
        other => panic!("expected InvertedRange, found {other:?}"),
    }
}

fn sources_config(polar_dir: Utf8PathBuf, reference: Utf8PathBuf) -> RankConfig {
    let mut args = complete_args();
    args.polar_dir = Some(polar_dir);
    args.reference = Some(reference);
    RankConfig::try_from(args).expect("config should build")
}

#[rstest]
fn validate_sources_accepts_existing_inputs() {
    let workspace = PolarWorkspace::new();
    let config = sources_config(
        workspace.root().to_path_buf(),
        workspace.reference().to_path_buf(),
    );
    config.validate_sources().expect("sources exist");
}

#[rstest]
fn validate_sources_reports_missing_directory() {
    let workspace = PolarWorkspace::new();
    let config = sources_config(
        workspace.root().join("absent"),
        workspace.reference().to_path_buf(),
    );
    match config.validate_sources().expect_err("expected failure") {
        CliError::MissingSourcePath { field, .. } => assert_eq!(field, ARG_POLAR_DIR),
        other => panic!("expected MissingSourcePath, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_directory_that_is_a_file() {
    let workspace = PolarWorkspace::new();
    let config = sources_config(
        workspace.reference().to_path_buf(),
        workspace.reference().to_path_buf(),
    );
    match config.validate_sources().expect_err("expected failure") {
        CliError::SourcePathNotDirectory { field, .. } => assert_eq!(field, ARG_POLAR_DIR),
        other => panic!("expected SourcePathNotDirectory, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_missing_reference() {
    let workspace = PolarWorkspace::new();
    let config = sources_config(
        workspace.root().to_path_buf(),
        workspace.root().join("absent_R_50000_N_9.csv"),
    );
    match config.validate_sources().expect_err("expected failure") {
        CliError::MissingSourcePath { field, .. } => assert_eq!(field, ARG_REFERENCE),
        other => panic!("expected MissingSourcePath, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_reference_that_is_a_directory() {
    let workspace = PolarWorkspace::new();
    let nested = workspace.root().join("nested");
    std::fs::create_dir(&nested).expect("create directory");
    let config = sources_config(workspace.root().to_path_buf(), nested);
    match config.validate_sources().expect_err("expected failure") {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_REFERENCE),
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "top": "many" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "polar_dir": "from-file",
            "reference": "from-file/reference_R_50000_N_9.csv",
            "formula": "max(cl)",
            "top": 3,
        }),
        None,
    );
    composer.push_environment(json!({
        "polar_dir": "from-env",
        "ncrit": 9,
    }));
    composer.push_cli(json!({
        "formula": "average(norm(cl/cd))",
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.polar_dir, Utf8PathBuf::from("from-env"));
    assert_eq!(
        config.reference,
        Utf8PathBuf::from("from-file/reference_R_50000_N_9.csv")
    );
    assert_eq!(config.formula, "average(norm(cl/cd))");
    assert_eq!(config.filter.ncrit, NcritSelection::Exactly(9));
    assert_eq!(config.top, 3);
}

#[rstest]
fn rank_prints_text_report() {
    let workspace = PolarWorkspace::new();
    let malformed = workspace.add_malformed("broken");
    let mut stdout = Vec::new();

    run_rank_with(workspace.rank_args(NORMALISED_LIFT), &mut stdout).expect("rank succeeds");

    let text = String::from_utf8(stdout).expect("stdout utf-8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines.first().copied(),
        Some(
            format!(
                "Top 2 of 2 candidate(s) by {NORMALISED_LIFT} against {}:",
                workspace.reference()
            )
            .as_str()
        )
    );
    let strong = lines
        .iter()
        .position(|line| line.contains(" strong "))
        .expect("strong is listed");
    let weak = lines
        .iter()
        .position(|line| line.contains(" weak "))
        .expect("weak is listed");
    assert!(strong < weak, "strong should rank above weak:\n{text}");
    assert!(lines[strong].contains("2.000000"));
    assert!(lines[weak].contains("1.000000"));
    assert!(text.contains("http://airfoiltools.com/airfoil/details?airfoil=strong"));
    assert!(
        text.contains(&format!("Rejected {malformed}: malformed polar file")),
        "rejections should be listed:\n{text}"
    );
}

#[rstest]
fn rank_prints_json_report() {
    let workspace = PolarWorkspace::new();
    workspace.add_malformed("broken");
    let args = RankArgs {
        format: Some(OutputFormat::Json),
        top: Some(1),
        ..workspace.rank_args(NORMALISED_LIFT)
    };
    let mut stdout = Vec::new();

    run_rank_with(args, &mut stdout).expect("rank succeeds");

    let report: Value = serde_json::from_slice(&stdout).expect("output should be JSON");
    assert_eq!(report["formula"], NORMALISED_LIFT);
    assert_eq!(report["candidates"], 2);
    let top = report["top"].as_array().expect("top is an array");
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["rank"], 1);
    assert_eq!(top[0]["name"], "strong");
    assert_eq!(top[0]["score"], 2.0);
    assert_eq!(top[0]["description"], Value::Null);
    assert_eq!(report["unscored"], Value::Array(Vec::new()));
    let reason = report["rejected"][0]["reason"]
        .as_str()
        .expect("reason is a string");
    assert!(reason.starts_with("malformed polar file: header line"));
}

#[rstest]
fn rank_reports_formula_errors() {
    let workspace = PolarWorkspace::new();
    let mut stdout = Vec::new();

    let err = run_rank_with(workspace.rank_args("max(norm(cl)"), &mut stdout)
        .expect_err("unbalanced formula should fail");
    assert!(matches!(err, CliError::Pipeline(_)), "found {err:?}");
    assert!(stdout.is_empty());
}

#[rstest]
fn rank_reports_malformed_reference() {
    let workspace = PolarWorkspace::new();
    write_utf8(workspace.reference(), b"not a polar");
    let mut stdout = Vec::new();

    let err = run_rank_with(workspace.rank_args(NORMALISED_LIFT), &mut stdout)
        .expect_err("malformed reference should fail");
    let rendered = foilrank_scorer::error_chain(&err);
    assert!(rendered.starts_with("reference polar"), "found {rendered}");
    assert!(rendered.contains("is malformed"));
}
