use tribunal_core::{
    CaseRecord, Complexity, EvidenceCategory, EvidenceItem, RelevanceTag, StatuteSection,
};

pub fn kumar_jewelry() -> CaseRecord {
    CaseRecord {
        id: "theft_case_1".into(),
        title: "The State vs. Rajesh Kumar".into(),
        case_type: "Theft Case".into(),
        description: "Theft of valuable jewelry from employer's residence".into(),
        summary: "Rajesh Kumar, employed as house help, allegedly stole diamond jewelry worth \
                  ₹5 lakhs from employer Mrs. Sharma's bedroom safe."
            .into(),
        complexity: Complexity::Medium,
        evidence: vec![
            EvidenceItem::new(
                "CCTV_Footage.mp4",
                EvidenceCategory::Digital,
                "CCTV footage shows accused entering employer's bedroom at 2:30 PM when family \
                 was absent. Clear image of accused near the safe location.",
                RelevanceTag::Critical,
            ),
            EvidenceItem::new(
                "Pawn_Shop_Receipt.pdf",
                EvidenceCategory::Documentary,
                "Receipt from pawn shop showing jewelry items matching description sold by person \
                 matching accused's identity on same day as theft.",
                RelevanceTag::High,
            ),
            EvidenceItem::new(
                "Employer_Statement.pdf",
                EvidenceCategory::Testimonial,
                "Mrs. Sharma's statement confirming missing jewelry items, their estimated value, \
                 and accused's access to house keys and safe location knowledge.",
                RelevanceTag::High,
            ),
        ],
        statutes: vec![
            StatuteSection::new(
                "379",
                "Theft",
                "Whoever intends to take dishonestly any movable property out of the possession \
                 of any person",
                &["theft", "dishonestly", "movable property", "possession", "intention"],
            ),
            StatuteSection::new(
                "381",
                "Theft by clerk or servant",
                "Theft by clerk or servant of property in possession of master",
                &["servant", "clerk", "master", "employment", "trust"],
            ),
        ],
    }
}
