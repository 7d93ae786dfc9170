//! Contract tests for the lookup service.
//!
//! 1. A cache hit never reaches a provider
//! 2. Providers are tried in priority order and the first result wins
//! 3. An exhausted scan yields no value and writes nothing
//! 4. Dividend distributions are summed before caching
//! 5. Cache failures surface as errors

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use qfinance_market_data::{AssetCategory, Distribution, PriceBar};

    use crate::errors::{Error, ValidationError};
    use crate::quotes::test_support::{harness, ibm_bar, ibm_date, Behavior, MockProvider};
    use crate::quotes::{CacheKey, CacheStore, DividendRecord, PriceField, PriceRecord};
    use crate::utils::dates::DateInput;

    fn ibm_serial() -> DateInput {
        DateInput::Serial(43434.0)
    }

    // =========================================================================
    // Cache behavior
    // =========================================================================

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let yahoo = MockProvider::new("yahoo", Behavior::Price(ibm_bar()));
        let h = harness(&[yahoo.clone()]);

        let first = h
            .lookup
            .resolve_price("IBM", "etf", &ibm_serial(), PriceField::Close)
            .await
            .unwrap();
        let second = h
            .lookup
            .resolve_price("IBM", "etf", &ibm_serial(), PriceField::Close)
            .await
            .unwrap();

        assert_eq!(first, Some(dec!(1.5)));
        assert_eq!(second, Some(dec!(1.5)));
        assert_eq!(yahoo.calls(), 1);
        assert_eq!(h.prices.puts(), 1);
    }

    #[tokio::test]
    async fn test_other_fields_come_from_cached_record() {
        let yahoo = MockProvider::new("yahoo", Behavior::Price(ibm_bar()));
        let h = harness(&[yahoo.clone()]);

        h.lookup
            .resolve_price("IBM", "etf", &ibm_serial(), PriceField::Close)
            .await
            .unwrap();

        let date = DateInput::from("2018-11-30");
        let open = h.lookup.resolve_price("ibm", "ETF", &date, PriceField::Open).await.unwrap();
        let high = h.lookup.resolve_price("IBM", "etf", &date, PriceField::High).await.unwrap();
        let low = h.lookup.resolve_price("IBM", "etf", &date, PriceField::Low).await.unwrap();
        let volume = h.lookup.resolve_price("IBM", "etf", &date, PriceField::Volume).await.unwrap();

        assert_eq!(open, Some(dec!(1)));
        assert_eq!(high, Some(dec!(2)));
        assert_eq!(low, Some(dec!(0.5)));
        assert_eq!(volume, Some(dec!(1000)));
        assert_eq!(yahoo.calls(), 1);
    }

    #[tokio::test]
    async fn test_preloaded_cache_skips_providers() {
        let yahoo = MockProvider::new("yahoo", Behavior::Fail);
        let h = harness(&[yahoo.clone()]);
        h.prices.insert(PriceRecord::from_bar(
            "AAPL",
            ibm_date(),
            PriceBar::new(ibm_date(), dec!(178.58)),
            "stooq",
        ));

        let close = h
            .lookup
            .price_record("aapl", AssetCategory::Stock, ibm_date())
            .await
            .unwrap()
            .map(|r| r.close);

        assert_eq!(close, Some(dec!(178.58)));
        assert_eq!(yahoo.calls(), 0);
    }

    #[tokio::test]
    async fn test_record_keyed_by_requested_date() {
        // Provider answers with the previous trading day
        let previous = NaiveDate::from_ymd_opt(2018, 11, 29).unwrap();
        let yahoo = MockProvider::new("yahoo", Behavior::Price(PriceBar::new(previous, dec!(3))));
        let h = harness(&[yahoo]);

        h.lookup
            .price_record("IBM", AssetCategory::Stock, ibm_date())
            .await
            .unwrap();

        let record = h.prices.get_record(&CacheKey::new("IBM", ibm_date())).unwrap();
        assert_eq!(record.close, dec!(3));
        assert_eq!(record.volume, 0);
        assert_eq!(record.source, "yahoo");
    }

    // =========================================================================
    // Provider scan
    // =========================================================================

    #[tokio::test]
    async fn test_fallback_stops_at_first_success() {
        let a = MockProvider::new("yahoo", Behavior::Fail);
        let b = MockProvider::new("tiingo", Behavior::Price(PriceBar::new(ibm_date(), dec!(7))));
        let c = MockProvider::new("wsj", Behavior::Price(PriceBar::new(ibm_date(), dec!(9))));
        let h = harness(&[a.clone(), b.clone(), c.clone()]);

        let record = h
            .lookup
            .price_record("IBM", AssetCategory::Stock, ibm_date())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.close, dec!(7));
        assert_eq!(record.source, "tiingo");
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
        assert_eq!(c.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_result_falls_through() {
        let a = MockProvider::new("yahoo", Behavior::Empty);
        let b = MockProvider::new("stooq", Behavior::Price(ibm_bar()));
        let h = harness(&[a.clone(), b.clone()]);

        let value = h
            .lookup
            .resolve_price("^DJI", "index", &ibm_serial(), PriceField::Close)
            .await
            .unwrap();

        assert_eq!(value, Some(dec!(1.5)));
        assert_eq!(a.calls(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_scan_writes_nothing() {
        let a = MockProvider::new("yahoo", Behavior::Fail);
        let b = MockProvider::new("tiingo", Behavior::Empty);
        let h = harness(&[a.clone(), b.clone()]);

        let value = h
            .lookup
            .resolve_price("IBM", "stock", &ibm_serial(), PriceField::Close)
            .await
            .unwrap();

        assert_eq!(value, None);
        assert_eq!(h.prices.puts(), 0);
        assert_eq!(h.prices.len().unwrap(), 0);

        // A later lookup tries the providers again
        h.lookup
            .resolve_price("IBM", "stock", &ibm_serial(), PriceField::Close)
            .await
            .unwrap();
        assert_eq!(a.calls(), 2);
        assert_eq!(b.calls(), 2);
    }

    #[tokio::test]
    async fn test_no_sources_is_not_available() {
        let h = harness(&[]);
        let value = h
            .lookup
            .price_record("IBM", AssetCategory::Stock, ibm_date())
            .await
            .unwrap();
        assert!(value.is_none());
    }

    // =========================================================================
    // Dividends
    // =========================================================================

    #[tokio::test]
    async fn test_dividends_are_summed_and_cached() {
        let yahoo = MockProvider::new(
            "yahoo",
            Behavior::Dividends(vec![
                Distribution::new(None, dec!(0.5)),
                Distribution::new(None, dec!(0.3)),
            ]),
        );
        let h = harness(&[yahoo.clone()]);

        let first = h.lookup.resolve_ttm_dividend("vym", &ibm_serial()).await.unwrap();
        let second = h.lookup.resolve_ttm_dividend("VYM", &ibm_serial()).await.unwrap();

        assert_eq!(first, Some(dec!(0.8)));
        assert_eq!(second, Some(dec!(0.8)));
        assert_eq!(yahoo.calls(), 1);

        let cached: DividendRecord = h
            .dividends
            .get_record(&CacheKey::new("VYM", ibm_date()))
            .unwrap();
        assert_eq!(cached.amount, dec!(0.8));
        assert_eq!(cached.source, "yahoo");
    }

    #[tokio::test]
    async fn test_dividend_fallback() {
        let yahoo = MockProvider::new("yahoo", Behavior::Empty);
        let cnbc = MockProvider::new(
            "cnbc",
            Behavior::Dividends(vec![Distribution::new(None, dec!(1.25))]),
        );
        let h = harness(&[yahoo, cnbc.clone()]);

        let value = h.lookup.resolve_ttm_dividend("T", &ibm_serial()).await.unwrap();
        assert_eq!(value, Some(dec!(1.25)));
        assert_eq!(cnbc.calls(), 1);
    }

    #[tokio::test]
    async fn test_dividends_exhausted() {
        let yahoo = MockProvider::new("yahoo", Behavior::Fail);
        let h = harness(&[yahoo]);

        let value = h.lookup.resolve_ttm_dividend("T", &ibm_serial()).await.unwrap();
        assert_eq!(value, None);
        assert_eq!(h.dividends.puts(), 0);
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[tokio::test]
    async fn test_cache_failure_is_an_error() {
        let yahoo = MockProvider::new("yahoo", Behavior::Price(ibm_bar()));
        let h = harness(&[yahoo.clone()]);
        h.prices.set_fail(true);

        let result = h
            .lookup
            .resolve_price("IBM", "etf", &ibm_serial(), PriceField::Close)
            .await;

        assert!(matches!(result, Err(Error::Database(_))));
        assert_eq!(yahoo.calls(), 0);
    }

    #[tokio::test]
    async fn test_normalization_failures() {
        let h = harness(&[]);

        let result = h
            .lookup
            .resolve_price("IBM", "bond", &ibm_serial(), PriceField::Close)
            .await;
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::InvalidCategory(_)))
        ));

        let result = h
            .lookup
            .resolve_price("IBM", "stock", &DateInput::Serial(0.0), PriceField::Close)
            .await;
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::InvalidDate(_)))
        ));

        let result = h.lookup.resolve_ttm_dividend("IBM", &DateInput::Boolean(true)).await;
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::InvalidDateFormat { .. }))
        ));
    }

    #[tokio::test]
    async fn test_zero_filled_fields_read_as_zero() {
        let stooq = MockProvider::new("stooq", Behavior::Price(PriceBar::new(ibm_date(), dec!(25538.46))));
        let h = harness(&[stooq]);

        let volume = h
            .lookup
            .resolve_price("^DJI", "index", &ibm_serial(), PriceField::Volume)
            .await
            .unwrap();
        assert_eq!(volume, Some(Decimal::ZERO));
    }
}
