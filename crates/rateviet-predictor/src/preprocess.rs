//! Vietnamese word segmentation
//!
//! PhoBERT-style checkpoints expect word-segmented input: multi-syllable
//! words joined into single tokens with `_` ("sản phẩm" → "sản_phẩm").
//! Segmentation here is lexicon-driven, matched leftmost-longest, so the
//! output is deterministic for any input.

use aho_corasick::{AhoCorasick, MatchKind};
use rateviet_core::{Error, Result};

/// Common multi-syllable words in product-review Vietnamese.
///
/// Entries are lowercase; longer compounds win through leftmost-longest
/// matching, so "kém chất lượng" takes precedence over "chất lượng".
const LEXICON: &[&str] = &[
    "kém chất lượng",
    "không đáng tiền",
    "bảo hành",
    "bình thường",
    "cẩn thận",
    "chắc chắn",
    "chất liệu",
    "chất lượng",
    "chính hãng",
    "chậm trễ",
    "cửa hàng",
    "dễ chịu",
    "giá cả",
    "giảm giá",
    "giao hàng",
    "giống hệt",
    "giới thiệu",
    "hài lòng",
    "hình ảnh",
    "hoàn hảo",
    "hoàn tiền",
    "hoàn toàn",
    "hư hỏng",
    "hàng giả",
    "hàng nhái",
    "hết hạn",
    "hỗ trợ",
    "hợp lý",
    "khác biệt",
    "khuyến mãi",
    "kiểm tra",
    "kinh khủng",
    "kích thước",
    "khó chịu",
    "liên hệ",
    "lừa đảo",
    "miễn phí",
    "màu sắc",
    "mẫu mã",
    "mô tả",
    "mua sắm",
    "nguyên vẹn",
    "nhanh chóng",
    "nhân viên",
    "nhiệt tình",
    "phản hồi",
    "phục vụ",
    "rẻ tiền",
    "sản phẩm",
    "sử dụng",
    "thái độ",
    "thân thiện",
    "thất vọng",
    "thiết kế",
    "thoải mái",
    "thời gian",
    "trải nghiệm",
    "trầy xước",
    "tuyệt vời",
    "tư vấn",
    "tệ hại",
    "tốt gỗ",
    "uy tín",
    "vận chuyển",
    "xuất sắc",
    "đáng giá",
    "đáng tiền",
    "đóng gói",
    "đúng hẹn",
    "đắt đỏ",
    "đầy đủ",
    "đặt hàng",
    "đổi trả",
];

/// Deterministic Vietnamese word segmenter.
///
/// `segment` is a pure function of its input: no side effects, no hidden
/// state, and it never fails — unknown characters pass through untouched.
pub struct Segmenter {
    compounds: AhoCorasick,
}

impl Segmenter {
    /// Build a segmenter over the embedded compound-word lexicon
    pub fn new() -> Result<Self> {
        let compounds = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(LEXICON)
            .map_err(|e| Error::inference(format!("failed to build segmentation lexicon: {e}")))?;

        Ok(Self { compounds })
    }

    /// Normalize and word-segment a raw review text.
    ///
    /// Lowercases, collapses whitespace runs, then joins the syllables of
    /// known compounds with `_`. Empty input yields the empty string.
    pub fn segment(&self, text: &str) -> String {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return normalized;
        }

        let mut out = String::with_capacity(normalized.len());
        let mut cursor = 0;

        for m in self.compounds.find_iter(&normalized) {
            if !on_word_boundary(&normalized, m.start(), m.end()) {
                continue;
            }
            out.push_str(&normalized[cursor..m.start()]);
            out.push_str(&normalized[m.start()..m.end()].replace(' ', "_"));
            cursor = m.end();
        }
        out.push_str(&normalized[cursor..]);

        out
    }
}

/// Lowercase, trim, and collapse whitespace runs to single spaces
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// A compound match inside a longer word ("an toàn" inside "bán toàn bộ")
// must not be rewritten.
fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let starts_clean = start == 0
        || text[..start]
            .chars()
            .next_back()
            .is_some_and(|c| !c.is_alphanumeric());
    let ends_clean = end == text.len()
        || text[end..].chars().next().is_some_and(|c| !c.is_alphanumeric());
    starts_clean && ends_clean
}
