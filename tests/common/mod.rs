#![allow(dead_code)]

use expense_classifier::{Pipeline, TrainerConfig, TrainingSet};

/// A small expense dataset with four categories and a few unusable rows.
pub const EXPENSES_CSV: &str = "\
date,subcategory,note,category,amount
2024-01-02,Coffee,starbucks latte,Food,4.50
2024-01-03,Groceries,walmart weekly groceries,Food,82.10
2024-01-04,Restaurant,pizza dinner with friends,Food,35.00
2024-01-05,Taxi,uber ride to airport,Transport,42.00
2024-01-06,Fuel,shell gas station,Transport,50.00
2024-01-07,Public transit,metro card top up,Transport,20.00
2024-01-08,Electricity,monthly power utility,Utilities,70.00
2024-01-09,Internet,comcast broadband,Utilities,60.00
2024-01-10,Water,city water utility,Utilities,25.00
2024-01-11,Streaming,netflix subscription,Entertainment,15.99
2024-01-12,Movies,cinema tickets,Entertainment,24.00
2024-01-13,Concert,live music tickets,Entertainment,80.00
2024-01-14,Snacks,vending machine chips,,2.00
2024-01-15,,,Food,10.00
";

pub fn training_set() -> TrainingSet {
    TrainingSet::from_reader(EXPENSES_CSV.as_bytes()).expect("fixture parses")
}

pub fn fitted_pipeline() -> Pipeline {
    expense_classifier::trainer::fit(&TrainerConfig::default(), &training_set())
        .expect("fixture fits")
}
