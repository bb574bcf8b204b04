use fundview::{Aggregator, EntitySummary, Normalizer, Selection, SummaryCalculator};
use polars::prelude::*;

fn funding_table() -> DataFrame {
    let raw = df!(
        "Startup Name" => &["Acme", "Acme", "Bolt", "Crest", "Dune", "Echo"],
        "Industry Vertical" => &[Some("Fintech"), Some("Fintech"), Some("Edtech"), Some("Health"), Some("Edtech"), None],
        "City Location" => &[Some("Bangalore"), Some("Bengaluru"), Some("Mumbai"), Some("New Delhi"), Some("Bombay"), Some("Pune")],
        "Investors Name" => &[
            Some("Alpha Ventures, Beta Capital"),
            Some("Alpha Ventures"),
            Some("Gamma Fund"),
            None,
            Some("Beta Capital & Delta"),
            Some("Omega"),
        ],
        "Date" => &[Some("01/01/2020"), Some("01/06/2021"), Some("15/03/2020"), Some("10/10/2019"), None, Some("02/02/2021")],
        "Amount Cr" => &[Some("100"), Some("Undisclosed"), Some("40"), Some("25"), Some("60"), None],
    )
    .unwrap();
    Normalizer::normalize(&raw).unwrap()
}

fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

fn floats(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect()
}

#[test]
fn funding_by_year_sums_disclosed_amounts_ascending() -> PolarsResult<()> {
    let by_year = Aggregator::funding_by_year(&funding_table())?;

    let years: Vec<Option<i32>> = by_year.column("year")?.i32()?.into_iter().collect();
    assert_eq!(years, vec![Some(2019), Some(2020), None]);
    assert_eq!(floats(&by_year, "amount_cr"), vec![25.0, 140.0, 60.0]);
    Ok(())
}

#[test]
fn funding_by_year_total_matches_disclosed_total() -> PolarsResult<()> {
    let df = funding_table();
    let by_year = Aggregator::funding_by_year(&df)?;

    let grouped: f64 = floats(&by_year, "amount_cr").iter().sum();
    let disclosed: f64 = df.column("amount_cr")?.f64()?.into_iter().flatten().sum();
    assert!((grouped - disclosed).abs() < 1e-9);
    Ok(())
}

#[test]
fn funding_by_month_buckets_on_year_month() -> PolarsResult<()> {
    let by_month = Aggregator::funding_by_month(&funding_table())?;
    assert_eq!(
        strings(&by_month, "month"),
        vec![
            Some("2019-10".to_string()),
            Some("2020-01".to_string()),
            Some("2020-03".to_string()),
            None,
        ]
    );
    Ok(())
}

#[test]
fn top_sectors_drop_nulls_and_sort_descending() -> PolarsResult<()> {
    let top = Aggregator::top_sectors(&funding_table(), 10)?;

    assert_eq!(
        strings(&top, "industry_vertical"),
        vec![
            Some("Edtech".to_string()),
            Some("Fintech".to_string()),
            Some("Health".to_string()),
        ]
    );
    assert_eq!(floats(&top, "amount_cr"), vec![100.0, 100.0, 25.0]);
    Ok(())
}

#[test]
fn ties_break_on_ascending_key() -> PolarsResult<()> {
    let raw = df!(
        "Startup Name" => &["x", "y", "z"],
        "Industry Vertical" => &["B", "A", "C"],
        "Amount Cr" => &["10", "10", "5"],
    )?;
    let top = Aggregator::top_sectors(&Normalizer::normalize(&raw).unwrap(), 10)?;
    assert_eq!(
        strings(&top, "industry_vertical"),
        vec![
            Some("A".to_string()),
            Some("B".to_string()),
            Some("C".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn top_n_truncates() -> PolarsResult<()> {
    let df = funding_table();
    assert_eq!(Aggregator::top_sectors(&df, 2)?.height(), 2);
    assert_eq!(Aggregator::top_cities(&df, 1)?.height(), 1);
    // fewer groups than n
    assert_eq!(Aggregator::top_cities(&df, 50)?.height(), 3);
    Ok(())
}

#[test]
fn oversized_n_keeps_every_group() -> PolarsResult<()> {
    let df = funding_table();
    let past_u32 = usize::try_from(1u64 << 32).unwrap_or(usize::MAX);

    for n in [past_u32, past_u32.saturating_add(1), usize::MAX] {
        assert_eq!(Aggregator::top_sectors(&df, n)?.height(), 3);
        assert_eq!(Aggregator::top_investors(&df, n)?.height(), 5);
        assert_eq!(Aggregator::city_amounts(&df, n)?.height(), 4);
        assert_eq!(Aggregator::city_round_counts(&df, n)?.height(), 4);
    }
    Ok(())
}

#[test]
fn top_cities_merge_aliases() -> PolarsResult<()> {
    let top = Aggregator::top_cities(&funding_table(), 10)?;
    assert_eq!(
        strings(&top, "city_location"),
        vec![
            Some("Bengaluru".to_string()),
            Some("Mumbai".to_string()),
            Some("Delhi".to_string()),
        ]
    );
    assert_eq!(floats(&top, "amount_cr"), vec![100.0, 100.0, 25.0]);
    Ok(())
}

#[test]
fn explosion_credits_full_amount_to_each_co_investor() -> PolarsResult<()> {
    let raw = df!(
        "Startup Name" => &["Acme"],
        "Investors Name" => &["Alpha Ventures, Beta Capital"],
        "Amount Cr" => &["10"],
    )?;
    let pairs = Aggregator::explode_investors(&Normalizer::normalize(&raw).unwrap())?;

    assert_eq!(
        strings(&pairs, "investor"),
        vec![Some("Alpha Ventures".to_string()), Some("Beta Capital".to_string())]
    );
    assert_eq!(floats(&pairs, "amount_cr"), vec![10.0, 10.0]);
    Ok(())
}

#[test]
fn top_investors_count_null_amounts_as_zero() -> PolarsResult<()> {
    let top = Aggregator::top_investors(&funding_table(), 15)?;

    assert_eq!(
        strings(&top, "investor"),
        vec![
            Some("Beta Capital".to_string()),
            Some("Alpha Ventures".to_string()),
            Some("Delta".to_string()),
            Some("Gamma Fund".to_string()),
            Some("Omega".to_string()),
        ]
    );
    assert_eq!(floats(&top, "amount_cr"), vec![160.0, 100.0, 60.0, 40.0, 0.0]);
    Ok(())
}

#[test]
fn top_investors_without_tokens_is_empty() -> PolarsResult<()> {
    let raw = df!(
        "Startup Name" => &["Acme", "Bolt"],
        "Investors Name" => &[None::<&str>, Some(" , ")],
        "Amount Cr" => &["10", "20"],
    )?;
    let top = Aggregator::top_investors(&Normalizer::normalize(&raw).unwrap(), 15)?;
    assert_eq!(top.height(), 0);
    Ok(())
}

#[test]
fn city_round_counts_include_undisclosed_rounds() -> PolarsResult<()> {
    let counts = Aggregator::city_round_counts(&funding_table(), 10)?;

    assert_eq!(
        strings(&counts, "city_location"),
        vec![
            Some("Bengaluru".to_string()),
            Some("Mumbai".to_string()),
            Some("Delhi".to_string()),
            Some("Pune".to_string()),
        ]
    );
    let rounds: Vec<Option<u32>> = counts.column("count")?.u32()?.into_iter().collect();
    assert_eq!(rounds, vec![Some(2), Some(2), Some(1), Some(1)]);
    Ok(())
}

#[test]
fn city_amounts_keep_cities_with_only_undisclosed_rounds() -> PolarsResult<()> {
    let amounts = Aggregator::city_amounts(&funding_table(), 10)?;

    assert_eq!(
        strings(&amounts, "city_location"),
        vec![
            Some("Bengaluru".to_string()),
            Some("Mumbai".to_string()),
            Some("Delhi".to_string()),
            Some("Pune".to_string()),
        ]
    );
    assert_eq!(floats(&amounts, "amount_cr"), vec![100.0, 100.0, 25.0, 0.0]);
    Ok(())
}

#[test]
fn sector_distribution_counts_rows() -> PolarsResult<()> {
    let sectors = Aggregator::sector_distribution(&funding_table())?;

    assert_eq!(
        strings(&sectors, "industry_vertical"),
        vec![
            Some("Edtech".to_string()),
            Some("Fintech".to_string()),
            Some("Health".to_string()),
        ]
    );
    let counts: Vec<Option<u32>> = sectors.column("count")?.u32()?.into_iter().collect();
    assert_eq!(counts, vec![Some(2), Some(2), Some(1)]);
    Ok(())
}

#[test]
fn top_startups_group_display_names() -> PolarsResult<()> {
    let top = Aggregator::top_startups(&funding_table(), 2)?;
    assert_eq!(
        strings(&top, "startup_name"),
        vec![Some("Acme".to_string()), Some("Dune".to_string())]
    );
    assert_eq!(floats(&top, "amount_cr"), vec![100.0, 60.0]);
    Ok(())
}

#[test]
fn empty_and_missing_inputs_give_empty_tables() -> PolarsResult<()> {
    let empty = funding_table().slice(0, 0);
    assert_eq!(Aggregator::funding_by_year(&empty)?.height(), 0);
    assert_eq!(Aggregator::top_sectors(&empty, 10)?.height(), 0);
    assert_eq!(Aggregator::top_investors(&empty, 10)?.height(), 0);
    assert_eq!(Aggregator::city_round_counts(&empty, 10)?.height(), 0);

    let bare = Normalizer::normalize(&df!("Startup Name" => &["Acme"])?).unwrap();
    let by_year = Aggregator::funding_by_year(&bare)?;
    assert_eq!(by_year.height(), 0);
    let names: Vec<String> = by_year
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, vec!["year", "amount_cr"]);
    assert_eq!(Aggregator::top_cities(&bare, 10)?.height(), 0);
    assert_eq!(Aggregator::sector_distribution(&bare)?.height(), 0);
    Ok(())
}

#[test]
fn entity_keys_are_sorted_distinct_and_skip_nulls() -> PolarsResult<()> {
    let df = funding_table();

    assert_eq!(
        Selection::startup_keys(&df)?,
        vec!["acme", "bolt", "crest", "dune", "echo"]
    );
    assert_eq!(
        Selection::investor_keys(&df)?,
        vec![
            "alpha ventures",
            "alpha ventures beta capital",
            "beta capital delta",
            "gamma fund",
            "omega",
        ]
    );
    Ok(())
}

#[test]
fn summary_reports_median_and_largest_disclosed_round() -> PolarsResult<()> {
    let df = funding_table();
    let edtech = df.filter(&df.column("industry_vertical")?.str()?.equal("Edtech"))?;

    let summary = SummaryCalculator::summarize(&edtech)?;
    assert_eq!(summary.rounds, 2);
    assert_eq!(summary.disclosed_rounds, 2);
    assert_eq!(summary.median_amount, Some(50.0));
    assert_eq!(summary.largest_amount, Some(60.0));
    assert_eq!(summary.distinct_startups, 2);

    // undisclosed rounds count as rounds but not as amounts
    let acme = Selection::filter_by_startup(&df, "Acme")?;
    let summary = SummaryCalculator::summarize(&acme)?;
    assert_eq!(summary.rounds, 2);
    assert_eq!(summary.disclosed_rounds, 1);
    assert_eq!(summary.median_amount, Some(100.0));
    assert_eq!(summary.largest_amount, Some(100.0));
    assert_eq!(summary.average_amount, 50.0);
    Ok(())
}

#[test]
fn summary_of_no_rows_is_zeroed() -> PolarsResult<()> {
    let summary = SummaryCalculator::summarize(&funding_table().slice(0, 0))?;

    assert_eq!(summary, EntitySummary::default());
    assert_eq!(summary.average_amount, 0.0);
    assert_eq!(summary.median_amount, None);
    assert_eq!(summary.largest_amount, None);
    Ok(())
}
