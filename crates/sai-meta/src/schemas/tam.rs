//! TAM microburst monitor and histogram.

use super::sai_ids;
use crate::attr::AttrFlags;
use crate::error::SaiResult;
use crate::schema::{AttributeMeta, ObjectSchema, ValueConstraint};
use crate::stats::{HistogramSchema, StatsSchema};
use crate::types::{ObjectType, NULL_OBJECT_ID};
use crate::value::{AttrValueType, AttributeValue};

sai_ids! {
    /// `sai_tam_microburst_attr_t`
    TamMicroburstAttr {
        TamId = 0,
        Statistic = 1,
        LevelA = 2,
        LevelB = 3,
        Transporter = 4,
        StatTypes = 5,
    }
}

sai_ids! {
    /// `sai_tam_microburst_stat_t`
    TamMicroburstStat {
        LastDuration = 0,
        LongestDuration = 1,
        ShortestDuration = 2,
        AverageDuration = 3,
        Number = 4,
    }
}

sai_ids! {
    /// `sai_tam_histogram_attr_t`
    TamHistogramAttr {
        TamId = 0,
        StatType = 1,
        BinBoundary = 2,
        Resolution = 3,
        ClearMode = 4,
        Transporter = 5,
    }
}

pub fn tam_microburst_schema() -> SaiResult<ObjectSchema> {
    use TamMicroburstAttr as A;
    use TamMicroburstStat as S;

    let stats = StatsSchema::new()
        .counter(S::LastDuration, "SAI_TAM_MICROBURST_STAT_LAST_DURATION")
        .counter(S::LongestDuration, "SAI_TAM_MICROBURST_STAT_LONGEST_DURATION")
        .counter(S::ShortestDuration, "SAI_TAM_MICROBURST_STAT_SHORTEST_DURATION")
        .counter(S::AverageDuration, "SAI_TAM_MICROBURST_STAT_AVERAGE_DURATION")
        .counter(S::Number, "SAI_TAM_MICROBURST_STAT_NUMBER")
        .with_custom_range();

    ObjectSchema::new(ObjectType::TamMicroburst)
        .with_stats(stats)
        .with(
            AttributeMeta::new(
                A::TamId,
                "SAI_TAM_MICROBURST_ATTR_TAM_ID",
                AttrValueType::Oid,
                AttrFlags::MANDATORY_CREATE_ONLY,
            )
            .objects(&[ObjectType::Tam]),
        )?
        .with(
            AttributeMeta::new(
                A::Statistic,
                "SAI_TAM_MICROBURST_ATTR_STATISTIC",
                AttrValueType::Oid,
                AttrFlags::MANDATORY_CREATE_ONLY,
            )
            .objects(&[ObjectType::TamStat]),
        )?
        .with(
            AttributeMeta::new(
                A::LevelA,
                "SAI_TAM_MICROBURST_ATTR_LEVEL_A",
                AttrValueType::U64,
                AttrFlags::CREATE_AND_SET,
            )
            .with_default(0u64),
        )?
        .with(
            AttributeMeta::new(
                A::LevelB,
                "SAI_TAM_MICROBURST_ATTR_LEVEL_B",
                AttrValueType::U64,
                AttrFlags::CREATE_AND_SET,
            )
            .with_default(0u64),
        )?
        .with(
            AttributeMeta::new(
                A::Transporter,
                "SAI_TAM_MICROBURST_ATTR_TRANSPORTER",
                AttrValueType::Oid,
                AttrFlags::CREATE_AND_SET,
            )
            .objects(&[ObjectType::TamTransporter])
            .allow_null()
            .with_default(AttributeValue::Oid(NULL_OBJECT_ID)),
        )?
        .with(
            AttributeMeta::new(
                A::StatTypes,
                "SAI_TAM_MICROBURST_ATTR_STAT_TYPES",
                AttrValueType::U32List,
                AttrFlags::CREATE_AND_SET,
            )
            .with_default(Vec::<u32>::new()),
        )
}

pub fn tam_histogram_schema() -> SaiResult<ObjectSchema> {
    use TamHistogramAttr as A;

    let stats = StatsSchema::new().with_histogram(HistogramSchema {
        boundary_attr: A::BinBoundary.into(),
        clear_on_read_attr: Some(A::ClearMode.into()),
    });

    ObjectSchema::new(ObjectType::TamHistogram)
        .with_stats(stats)
        .with(
            AttributeMeta::new(
                A::TamId,
                "SAI_TAM_HISTOGRAM_ATTR_TAM_ID",
                AttrValueType::Oid,
                AttrFlags::MANDATORY_CREATE_AND_SET,
            )
            .objects(&[ObjectType::Tam]),
        )?
        .with(
            AttributeMeta::new(
                A::StatType,
                "SAI_TAM_HISTOGRAM_ATTR_STAT_TYPE",
                AttrValueType::ObjectList,
                AttrFlags::CREATE_AND_SET,
            )
            .objects(&[ObjectType::TamStat])
            .with_default(AttributeValue::ObjectList(Vec::new())),
        )?
        .with(
            AttributeMeta::new(
                A::BinBoundary,
                "SAI_TAM_HISTOGRAM_ATTR_BIN_BOUNDARY",
                AttrValueType::U32List,
                AttrFlags::MANDATORY_CREATE_AND_SET,
            )
            .with_constraint(ValueConstraint::Ascending),
        )?
        .with(
            AttributeMeta::new(
                A::Resolution,
                "SAI_TAM_HISTOGRAM_ATTR_RESOLUTION",
                AttrValueType::U32,
                AttrFlags::CREATE_AND_SET,
            )
            .with_default(0u32),
        )?
        .with(
            AttributeMeta::new(
                A::ClearMode,
                "SAI_TAM_HISTOGRAM_ATTR_CLEAR_MODE",
                AttrValueType::Bool,
                AttrFlags::CREATE_AND_SET,
            )
            .with_default(true),
        )?
        .with(
            AttributeMeta::new(
                A::Transporter,
                "SAI_TAM_HISTOGRAM_ATTR_TRANSPORTER",
                AttrValueType::Oid,
                AttrFlags::CREATE_AND_SET,
            )
            .objects(&[ObjectType::TamTransporter])
            .allow_null()
            .with_default(AttributeValue::Oid(NULL_OBJECT_ID)),
        )
        .map(ObjectSchema::with_custom_range)
}
