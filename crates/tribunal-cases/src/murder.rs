use tribunal_core::{
    CaseRecord, Complexity, EvidenceCategory, EvidenceItem, RelevanceTag, StatuteSection,
};

pub fn croft_poisoning() -> CaseRecord {
    CaseRecord {
        id: "murder_case_1".into(),
        title: "The State vs. Julian Croft".into(),
        case_type: "Murder Case".into(),
        description: "Murder by poisoning during a social gathering".into(),
        summary: "On September 9th, Elias Vance died from poison at Julian Croft's dinner party. \
                  Evidence suggests premeditated murder over artistic theft dispute."
            .into(),
        complexity: Complexity::High,
        evidence: vec![
            EvidenceItem::new(
                "Exhibit_A_Torn_Sheet_Music.pdf",
                EvidenceCategory::Physical,
                "Torn sheet music found at crime scene showing confrontation between victim and \
                 accused over artistic theft. Paper analysis confirms victim's handwriting.",
                RelevanceTag::High,
            ),
            EvidenceItem::new(
                "Exhibit_B_Poison_Gloves.pdf",
                EvidenceCategory::Forensic,
                "Latex gloves found in accused's possession with traces of cyanide compound. \
                 Chain of custody maintained by investigating officer.",
                RelevanceTag::Critical,
            ),
            EvidenceItem::new(
                "Exhibit_C_Encrypted_Communications.pdf",
                EvidenceCategory::Digital,
                "Encrypted email thread between accused and unknown party discussing 'permanent \
                 solution to plagiarism problem'. Digital forensics confirmed authenticity.",
                RelevanceTag::High,
            ),
            EvidenceItem::new(
                "Post_Mortem_Report.pdf",
                EvidenceCategory::Medical,
                "Official post-mortem examination by certified pathologist confirms death by \
                 cyanide poisoning. Time of death: 11:30 PM on September 9th. No other \
                 contributing factors.",
                RelevanceTag::Critical,
            ),
            EvidenceItem::new(
                "Witness_Statement_Host.pdf",
                EvidenceCategory::Testimonial,
                "Party host witnessed heated argument between victim and accused at 10:45 PM \
                 regarding stolen musical compositions. Accused appeared agitated and left briefly.",
                RelevanceTag::High,
            ),
        ],
        statutes: vec![
            StatuteSection::new(
                "302",
                "Murder",
                "Whoever commits murder shall be punished with death, or imprisonment for life, \
                 and shall also be liable to fine",
                &["murder", "kill", "death", "unlawful", "intention", "premeditation"],
            ),
            StatuteSection::new(
                "304",
                "Culpable homicide not amounting to murder",
                "Punishment for culpable homicide not amounting to murder",
                &["homicide", "death", "intention", "knowledge", "without premeditation"],
            ),
            StatuteSection::new(
                "201",
                "Causing disappearance of evidence",
                "Whoever causes disappearance of evidence or gives false information",
                &["evidence", "destruction", "concealment", "false information"],
            ),
        ],
    }
}
