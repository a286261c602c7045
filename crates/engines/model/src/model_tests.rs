use super::*;
use chess_analysis::keys;

/// A model that scores positions purely by material differential, in pawns.
fn material_model() -> LinearModel {
    let idx = FEATURE_COLUMNS
        .iter()
        .position(|c| *c == keys::MATERIAL)
        .unwrap();
    let mut coefficients = vec![0.0; FEATURE_COLUMNS.len()];
    coefficients[idx] = 1.0;
    LinearModel::new(coefficients, 0.0)
}

#[test]
fn predict_is_dot_product_plus_intercept() {
    let model = LinearModel {
        columns: vec!["a".into(), "b".into()],
        coefficients: vec![2.0, -1.0],
        intercept: 0.5,
    };
    assert_eq!(model.predict(&[3.0, 4.0]).unwrap(), 2.5);
}

#[test]
fn predict_rejects_wrong_dimensions() {
    let model = material_model();
    assert!(matches!(
        model.predict(&[1.0, 2.0]),
        Err(ModelError::Dimension { .. })
    ));
}

#[test]
fn save_and_load_roundtrip() {
    let path = std::env::temp_dir().join("linear_model_roundtrip.json");
    let model = LinearModel::new(vec![0.5; FEATURE_COLUMNS.len()], -1.25);
    model.save(&path).unwrap();
    let loaded = LinearModel::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.columns, model.columns);
    assert_eq!(loaded.coefficients, model.coefficients);
    assert_eq!(loaded.intercept, model.intercept);
}

#[test]
fn load_rejects_mismatched_columns() {
    let path = std::env::temp_dir().join("linear_model_mismatched.json");
    let broken = LinearModel {
        columns: vec!["material".into()],
        coefficients: vec![1.0, 2.0],
        intercept: 0.0,
    };
    let file = std::fs::File::create(&path).unwrap();
    serde_json::to_writer(file, &broken).unwrap();

    assert!(matches!(
        LinearModel::load(&path),
        Err(ModelError::Dimension { .. })
    ));
    std::fs::remove_file(&path).ok();
}

#[test]
fn balanced_position_scores_by_intercept() {
    let mut model = material_model();
    model.intercept = 0.25;
    let mut engine = ModelEngine::new(model);

    engine
        .set_position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
        .unwrap();
    assert_eq!(engine.evaluate().unwrap(), RawScore::Cp(25));
}

#[test]
fn decided_positions_bypass_the_model() {
    let mut engine = ModelEngine::new(material_model());

    // Back-rank mate, white has won.
    engine
        .set_position("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1")
        .unwrap();
    assert_eq!(engine.evaluate().unwrap(), RawScore::Cp(DECIDED_SCORE_CP));

    // Stalemate is a draw.
    engine.set_position("k7/8/1Q6/8/8/8/8/1K6 b - - 0 1").unwrap();
    assert_eq!(engine.evaluate().unwrap(), RawScore::Cp(0));
}

#[test]
fn white_picks_the_move_maximizing_the_prediction() {
    let mut engine = ModelEngine::new(material_model());
    // White can win the queen with exd5.
    engine.set_position("k7/8/8/3q4/4P3/8/8/K7 w - - 0 1").unwrap();
    assert_eq!(engine.best_move().unwrap().as_deref(), Some("e4d5"));
}

#[test]
fn black_picks_the_move_minimizing_the_prediction() {
    let mut engine = ModelEngine::new(material_model());
    // Black can win the queen with exd5.
    engine
        .set_position("7k/8/4p3/3Q4/8/8/8/K7 b - - 0 1")
        .unwrap();
    assert_eq!(engine.best_move().unwrap().as_deref(), Some("e6d5"));
}

#[test]
fn best_move_is_absent_in_finished_positions() {
    let mut engine = ModelEngine::new(material_model());
    engine
        .set_position("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1")
        .unwrap();
    assert_eq!(engine.best_move().unwrap(), None);
}

#[test]
fn failed_prediction_degrades_to_an_equal_score() {
    let broken = LinearModel {
        columns: vec!["material".into()],
        coefficients: vec![1.0],
        intercept: 0.0,
    };
    let mut engine = ModelEngine::new(broken);
    engine
        .set_position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
        .unwrap();
    assert_eq!(engine.evaluate().unwrap(), RawScore::Cp(0));
}
