mod common;

use std::sync::Arc;
use std::thread;

use expense_classifier::{ClassDefinition, ClassifierError, Pipeline, Predict};

#[test]
fn test_end_to_end_classification() -> Result<(), ClassifierError> {
    let pipeline = Pipeline::builder()
        .add_class(
            ClassDefinition::new("Food")
                .with_examples(vec!["starbucks coffee", "bakery bread", "sushi lunch"]),
        )?
        .add_class(
            ClassDefinition::new("Transport")
                .with_examples(vec!["uber ride", "train ticket", "parking garage"]),
        )?
        .build()?;

    assert_eq!(pipeline.predict("coffee")?, "Food");
    assert_eq!(pipeline.predict("uber to the station")?, "Transport");
    Ok(())
}

#[test]
fn test_training_descriptions_round_trip() -> Result<(), ClassifierError> {
    let set = common::training_set();
    let pipeline = common::fitted_pipeline();

    for example in &set.examples {
        assert_eq!(
            pipeline.predict(&example.description)?,
            example.category,
            "description {:?}",
            example.description
        );
    }
    Ok(())
}

#[test]
fn test_prediction_is_a_known_label() -> Result<(), ClassifierError> {
    let pipeline = common::fitted_pipeline();
    let label = pipeline.predict("starbucks coffee")?;
    assert!(pipeline.labels().contains(&label));
    assert_eq!(label, "Food");
    Ok(())
}

#[test]
fn test_unknown_words_still_predict() -> Result<(), ClassifierError> {
    let pipeline = common::fitted_pipeline();
    let label = pipeline.predict("qwertyuiop")?;
    assert!(pipeline.labels().contains(&label));

    let label = pipeline.predict("")?;
    assert!(pipeline.labels().contains(&label));
    Ok(())
}

#[test]
fn test_repeated_predictions_agree() -> Result<(), ClassifierError> {
    let pipeline = common::fitted_pipeline();
    let first = pipeline.predict("netflix and cinema")?;
    let second = pipeline.predict("netflix and cinema")?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_refit_is_deterministic() -> Result<(), ClassifierError> {
    let first = common::fitted_pipeline();
    let second = common::fitted_pipeline();
    for text in ["gas", "broadband bill", "music", "pizza"] {
        assert_eq!(first.decision_scores(text)?, second.decision_scores(text)?);
    }
    Ok(())
}

#[test]
fn test_info() {
    let pipeline = common::fitted_pipeline();
    let info = pipeline.info();
    assert_eq!(
        info.labels,
        vec!["Entertainment", "Food", "Transport", "Utilities"]
    );
    assert_eq!(info.ngram_range, (1, 2));
    assert!(info.english_stop_words);
    assert_eq!(info.c, 1.0);
}

#[test]
fn test_thread_safety() {
    let pipeline: Arc<dyn Predict> = Arc::new(common::fitted_pipeline());
    let mut handles = vec![];

    for _ in 0..3 {
        let pipeline = Arc::clone(&pipeline);
        let handle = thread::spawn(move || {
            let result = pipeline.predict("uber ride");
            assert_eq!(result.unwrap(), "Transport");
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
