use super::ProgramRecord;
use crate::analytics::domain::{FunnelStageCount, ProgramLevel, SpendData};

use ProgramLevel::{Certificate, Degree};

type SampleRow = (
    &'static str,
    ProgramLevel,
    &'static str,
    [Option<u64>; 5],
    Option<f64>,
);

// (school, level, program, [visitors, inquiries, opportunities, applications, enrollments], spend)
const SAMPLE_PORTFOLIO: [SampleRow; 14] = [
    (
        "SMU",
        Certificate,
        "Lean Six Sigma Yellow",
        [Some(5_200), Some(424), Some(190), Some(118), Some(68)],
        Some(96_000.0),
    ),
    (
        "Emory ECE",
        Certificate,
        "Lean Six Sigma Yellow Belt Cert",
        [Some(7_900), Some(652), Some(301), Some(206), Some(102)],
        Some(178_500.0),
    ),
    (
        "MSU",
        Certificate,
        "Transformation Leadership & Creative Thinking Cert",
        [None, Some(126), Some(58), Some(43), Some(21)],
        Some(26_250.0),
    ),
    (
        "USF",
        Degree,
        "MS in Health Informatics",
        [Some(14_800), Some(1_600), Some(352), Some(160), Some(96)],
        Some(312_000.0),
    ),
    (
        "Emory GBS",
        Certificate,
        "Leveraging AI for Business Success",
        [Some(21_000), Some(1_965), Some(520), Some(316), Some(116)],
        Some(290_000.0),
    ),
    (
        "KEEP",
        Certificate,
        "Negotiations Fundamentals Certificate",
        [Some(4_100), Some(373), Some(95), Some(61), Some(20)],
        Some(41_000.0),
    ),
    (
        "ECSU",
        Degree,
        "MS in Applied Data Science",
        [None, Some(598), Some(120), Some(71), Some(31)],
        Some(198_400.0),
    ),
    (
        "MSU",
        Degree,
        "MS in Supply Chain Management",
        [Some(19_500), Some(2_475), Some(228), Some(84), Some(25)],
        Some(99_000.0),
    ),
    (
        "SMU",
        Degree,
        "NPL",
        [None, Some(1_631), Some(103), Some(29), Some(20)],
        Some(142_000.0),
    ),
    (
        "Emory GBS",
        Certificate,
        "Driving ROI with Analytics",
        [None, Some(885), Some(215), Some(94), Some(32)],
        Some(185_000.0),
    ),
    (
        "KEEP",
        Certificate,
        "Data Driven Decision Making",
        [None, Some(12), Some(7), Some(5), Some(4)],
        Some(3_000.0),
    ),
    (
        "Emory ECE",
        Certificate,
        "Women in Leadership",
        [None, Some(585), Some(140), Some(52), Some(20)],
        None,
    ),
    (
        "MSU",
        Degree,
        "Strategic Management Graduate Certificate",
        [None, Some(69), Some(10), Some(5), None],
        Some(12_000.0),
    ),
    (
        "USF",
        Certificate,
        "USF Micro Credential",
        [None, Some(109), None, None, None],
        Some(8_000.0),
    ),
];

/// Built-in portfolio covering every recommendation outcome.
pub fn sample_records() -> Vec<ProgramRecord> {
    SAMPLE_PORTFOLIO
        .iter()
        .map(|(school, level, program_name, stages, spend)| {
            let [visitors, inquiries, opportunities, applications, enrollments] = *stages;
            ProgramRecord {
                school: school.to_string(),
                level: *level,
                program_name: program_name.to_string(),
                funnel: FunnelStageCount {
                    visitors,
                    inquiries,
                    opportunities,
                    applications,
                    enrollments,
                },
                spend: spend.map(SpendData::total),
            }
        })
        .collect()
}
