//! Integration tests for module exports and the configured date context.
//!
//! Verifies that public types are reachable via absolute paths and that a
//! `DateConfig` wires clock, calendar and conventions together.

use busdate_core::types::Date;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Types module re-exports are reachable.
#[test]
fn test_types_module_exports() {
    use busdate_core::types::error::{ConventionError, DateError, PeriodError};
    use busdate_core::types::serial::{days_in_month, is_leap_year, SerialDate};
    use busdate_core::types::{
        BusinessDayConvention, DateExpression, DayCountConvention, Instruction, Period,
    };

    assert_eq!(SerialDate::new(42371).to_ymd(), (2016, 1, 2));
    assert!(is_leap_year(2000));
    assert_eq!(days_in_month(2015, 2), 28);
    assert_eq!(Period::parse("1Y").unwrap(), Period::from_years(1));
    assert_eq!(BusinessDayConvention::default(), BusinessDayConvention::Unadjusted);
    assert_eq!(DayCountConvention::default(), DayCountConvention::Act36525);

    let expr = DateExpression::scan("MF").unwrap();
    assert_eq!(
        expr.instructions(),
        &[Instruction::Adjust(BusinessDayConvention::ModifiedFollowing)]
    );

    let err: DateError = PeriodError::Empty.into();
    assert!(matches!(err, DateError::Parse(_)));
    assert_eq!(
        "XYZ".parse::<BusinessDayConvention>(),
        Err(ConventionError::UnknownBusinessDay("XYZ".to_string()))
    );
}

/// Calendar module re-exports are reachable.
#[test]
fn test_calendar_module_exports() {
    use busdate_core::calendar::{easter_sunday, target_days, Calendar, HolidayCalendar};

    let easter = easter_sunday(2016);
    assert_eq!(easter, Date::from_ymd(2016, 3, 27).unwrap());
    let days = target_days(2016);
    assert_eq!(days.len(), 6);

    let custom = Calendar::from(days);
    assert_eq!(custom.name(), "CUSTOM");
    assert!(!custom.is_business_day(Date::from_ymd(2016, 3, 25).unwrap()));
}

/// A TOML configuration drives clock, calendar and default conventions.
#[test]
fn test_config_builds_date_context() {
    use busdate_core::calendar::HolidayCalendar;
    use busdate_core::config::DateConfig;
    use busdate_core::types::{BusinessDayConvention, Clock, DayCountConvention, Period};

    init_tracing();

    let config = DateConfig::from_toml_str(
        r#"
        base_date = "20151231"
        calendar = "CUSTOM"
        holidays = ["20160104"]
        day_count = "ACT/360"
        convention = "MODFOLLOW"
        "#,
    )
    .unwrap();
    config.validate().unwrap();

    let clock = config.clock();
    let calendar = config.calendar().unwrap();
    let today = clock.today();
    assert_eq!(today, Date::from_int(20151231).unwrap());

    let spot = today.add_period(&Period::parse("2B").unwrap(), &calendar);
    assert_eq!(spot, Date::from_int(20160105).unwrap());
    assert!(calendar.is_business_day(Date::from_int(20160101).unwrap()));

    assert_eq!(config.convention, BusinessDayConvention::ModifiedFollowing);
    assert_eq!(config.day_count, DayCountConvention::Act360);
    let maturity = config.convention.adjust(spot + Period::parse("3M").unwrap(), &calendar);
    assert_eq!(maturity, Date::from_int(20160405).unwrap());
}
