//! Instruction template sent with every correction request

/// Asks for (1) noun-ending sentence style, (2) removal of disallowed words,
/// (3) cleanup of special symbols, and a reply containing only the corrected body.
pub const CORRECTION_INSTRUCTION: &str =
    "아래 생기부를 1)명사형 종결 2)금지어 제거 3)특수기호 정제하여 '수정된 본문'만 출력해줘:";

/// Build the full prompt for one document
pub fn build_correction_prompt(original_text: &str) -> String {
    format!("{CORRECTION_INSTRUCTION}\n\n{original_text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_instruction_then_text() {
        let prompt = build_correction_prompt("He loves coding & math!");
        assert!(prompt.starts_with(CORRECTION_INSTRUCTION));
        assert!(prompt.ends_with("\n\nHe loves coding & math!"));
    }

    #[test]
    fn test_prompt_keeps_text_verbatim() {
        let text = "  줄바꿈\n포함 ※ 본문  ";
        assert!(build_correction_prompt(text).ends_with(text));
    }
}
