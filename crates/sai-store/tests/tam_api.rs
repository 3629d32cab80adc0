//! TAM microburst monitors and histograms.

use pretty_assertions::assert_eq;
use sai_meta::schemas::tam::{TamHistogramAttr, TamMicroburstAttr, TamMicroburstStat};
use sai_meta::{
    Attribute, AttributeValue, SaiStatus, StatsMode, TamHistogramOid, TamOid, TamStatOid,
    TamTransporterOid, CUSTOM_RANGE_START, STAT_CUSTOM_RANGE_BASE,
};
use sai_store::{MapProfile, SaiContext, TamApi};
use std::sync::Arc;

fn context() -> SaiContext {
    SaiContext::initialize(0, Arc::new(MapProfile::new())).unwrap()
}

fn tam() -> TamOid {
    TamOid::from_raw_unchecked(0x100)
}

fn histogram(context: &SaiContext, api: &dyn TamApi, boundaries: Vec<u32>) -> TamHistogramOid {
    api.create_tam_histogram(
        context.switch_id(),
        &[
            Attribute::new(TamHistogramAttr::TamId, tam()),
            Attribute::new(TamHistogramAttr::BinBoundary, boundaries),
        ],
    )
    .unwrap()
}

#[test]
fn test_microburst_lifecycle() {
    let context = context();
    let api = context.tam_api().unwrap();

    let err = api
        .create_tam_microburst(&[Attribute::new(TamMicroburstAttr::TamId, tam())])
        .unwrap_err();
    assert_eq!(err.status(), SaiStatus::InvalidParameter);

    let id = api
        .create_tam_microburst(&[
            Attribute::new(TamMicroburstAttr::TamId, tam()),
            Attribute::new(TamMicroburstAttr::Statistic, TamStatOid::from_raw_unchecked(0x200)),
            Attribute::new(TamMicroburstAttr::LevelA, 1_000u64),
        ])
        .unwrap();

    let transporter = TamTransporterOid::from_raw_unchecked(0x300);
    api.set_tam_microburst_attribute(
        id,
        &[
            Attribute::new(TamMicroburstAttr::Transporter, transporter),
            Attribute::new(TamMicroburstAttr::StatTypes, vec![1u32, 2]),
        ],
    )
    .unwrap();
    let list = api
        .get_tam_microburst_attribute(
            id,
            &[
                TamMicroburstAttr::LevelA.into(),
                TamMicroburstAttr::LevelB.into(),
                TamMicroburstAttr::Transporter.into(),
                TamMicroburstAttr::StatTypes.into(),
            ],
        )
        .unwrap();
    assert_eq!(
        list.into_result()
            .unwrap()
            .into_iter()
            .map(|attr| attr.value)
            .collect::<Vec<_>>(),
        vec![
            AttributeValue::U64(1_000),
            AttributeValue::U64(0),
            AttributeValue::Oid(0x300),
            AttributeValue::U32List(vec![1, 2]),
        ]
    );

    api.remove_tam_microburst(id).unwrap();
    assert_eq!(
        api.record_microburst(id, 5).unwrap_err().status(),
        SaiStatus::InvalidObjectId
    );
}

#[test]
fn test_microburst_stats() {
    let context = context();
    let api = context.tam_api().unwrap();
    let id = api
        .create_tam_microburst(&[
            Attribute::new(TamMicroburstAttr::TamId, tam()),
            Attribute::new(TamMicroburstAttr::Statistic, TamStatOid::from_raw_unchecked(0x200)),
        ])
        .unwrap();

    for duration in [400, 100, 250] {
        api.record_microburst(id, duration).unwrap();
    }

    use TamMicroburstStat as S;
    let ids = [
        S::Number.into(),
        S::LastDuration.into(),
        S::ShortestDuration.into(),
        S::LongestDuration.into(),
        S::AverageDuration.into(),
        STAT_CUSTOM_RANGE_BASE + 4,
    ];
    assert_eq!(
        api.get_tam_microburst_stats(id, &ids, StatsMode::ReadAndClear)
            .unwrap(),
        vec![3, 250, 100, 400, 250, 0]
    );
    assert_eq!(
        api.get_tam_microburst_stats(id, &ids[..2], StatsMode::Read).unwrap(),
        vec![0, 0]
    );

    // After a clear the next burst starts a fresh series.
    api.record_microburst(id, 900).unwrap();
    assert_eq!(
        api.get_tam_microburst_stats(
            id,
            &[S::ShortestDuration.into(), S::AverageDuration.into()],
            StatsMode::Read
        )
        .unwrap(),
        vec![900, 900]
    );

    api.clear_tam_microburst_stats(id, &[S::Number.into()]).unwrap();
    assert_eq!(
        api.get_tam_microburst_stats(id, &[S::Number.into()], StatsMode::Read)
            .unwrap(),
        vec![0]
    );

    let err = api
        .get_tam_microburst_stats(id, &[S::Number as u32 + 1], StatsMode::Read)
        .unwrap_err();
    assert_eq!(err.status(), SaiStatus::InvalidParameter);
}

#[test]
fn test_histogram_bins_and_overflow() {
    let context = context();
    let api = context.tam_api().unwrap();
    let id = histogram(&context, api.as_ref(), vec![0, 64, 128, 256]);

    for value in [0, 10, 64, 200, 300, 70_000] {
        api.record_histogram_sample(id, value).unwrap();
    }

    let err = api.get_tam_histogram_stats(id, 2).unwrap_err();
    assert_eq!(err, sai_meta::SaiError::BufferOverflow { required: 4 });
    assert_eq!(err.status(), SaiStatus::BufferOverflow);

    api.set_tam_histogram_attribute(id, Attribute::new(TamHistogramAttr::ClearMode, false))
        .unwrap();
    assert_eq!(api.get_tam_histogram_stats(id, 4).unwrap(), vec![2, 1, 1, 2]);
    assert_eq!(api.get_tam_histogram_stats(id, 4).unwrap(), vec![2, 1, 1, 2]);

    api.set_tam_histogram_attribute(id, Attribute::new(TamHistogramAttr::ClearMode, true))
        .unwrap();
    assert_eq!(api.get_tam_histogram_stats(id, 4).unwrap(), vec![2, 1, 1, 2]);
    assert_eq!(api.get_tam_histogram_stats(id, 4).unwrap(), vec![0, 0, 0, 0]);
}

#[test]
fn test_histogram_boundary_change_resets_bins() {
    let context = context();
    let api = context.tam_api().unwrap();
    let id = histogram(&context, api.as_ref(), vec![0, 100]);
    api.set_tam_histogram_attribute(id, Attribute::new(TamHistogramAttr::ClearMode, false))
        .unwrap();
    api.record_histogram_sample(id, 150).unwrap();

    let err = api
        .set_tam_histogram_attribute(
            id,
            Attribute::new(TamHistogramAttr::BinBoundary, vec![50u32, 10]),
        )
        .unwrap_err();
    assert_eq!(err.status(), SaiStatus::InvalidAttributeValue);
    assert_eq!(api.get_tam_histogram_stats(id, 2).unwrap(), vec![0, 1]);

    api.set_tam_histogram_attribute(
        id,
        Attribute::new(TamHistogramAttr::BinBoundary, vec![0u32, 10, 20]),
    )
    .unwrap();
    assert_eq!(api.get_tam_histogram_stats(id, 3).unwrap(), vec![0, 0, 0]);
}

#[test]
fn test_histogram_custom_attribute_range() {
    let context = context();
    let api = context.tam_api().unwrap();
    let id = histogram(&context, api.as_ref(), vec![0]);

    // The range is open but holds no attributes yet.
    let err = api
        .set_tam_histogram_attribute(id, Attribute::new(CUSTOM_RANGE_START, 1u32))
        .unwrap_err();
    assert_eq!(err.status(), SaiStatus::UnknownAttribute);

    let list = api
        .get_tam_histogram_attribute(
            id,
            &[TamHistogramAttr::Transporter as u32 + 1, TamHistogramAttr::Resolution.into()],
        )
        .unwrap();
    assert_eq!(
        list.slots().iter().map(|slot| slot.status()).collect::<Vec<_>>(),
        vec![SaiStatus::InvalidAttribute, SaiStatus::Success]
    );
}
