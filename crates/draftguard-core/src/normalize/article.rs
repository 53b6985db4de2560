//! Long-form SEO article normalizer (blog narrator mode).
//!
//! A raw article that satisfies the blogger contract is accepted as-is.
//! Anything else is replaced by a deterministic synthesized article: intro,
//! six fixed sections with two templated paragraphs each, a three-item FAQ
//! block, and a closing CTA, padded up to the minimum word count.

use lazy_static::lazy_static;
use regex::Regex;

use crate::contract::blogger_contract;
use crate::types::{Language, RunContext};

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"(?im)^(##\s+\S|H[23]\s*:)").unwrap();
    static ref FAQ_ITEM: Regex = Regex::new(r"(?im)^Q\d+\s*:").unwrap();
}

/// Hard ceiling on the padding loop; guarantees termination even if a
/// template is edited down to nothing.
const MAX_PAD_ITERATIONS: usize = 20;

/// Result of article normalization.
#[derive(Debug, Clone, Default)]
pub struct ArticleOutcome {
    pub value: String,
    pub used_fallback: bool,
    pub reasons: Vec<String>,
    pub word_count: usize,
    pub heading_count: usize,
    pub faq_count: usize,
}

pub(crate) fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

pub(crate) fn count_headings(text: &str) -> usize {
    HEADING.find_iter(text).count()
}

pub(crate) fn count_faq_items(text: &str) -> usize {
    FAQ_ITEM.find_iter(text).count()
}

/// Trim to at most `max` words, preserving line structure so headings and
/// FAQ markers survive.
fn trim_words(text: &str, max: usize) -> String {
    let mut remaining = max;
    let mut out = Vec::new();
    for line in text.lines() {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() <= remaining {
            remaining -= words.len();
            out.push(line.to_string());
        } else {
            if remaining > 0 {
                out.push(words[..remaining].join(" "));
            }
            break;
        }
        if remaining == 0 {
            break;
        }
    }
    out.join("\n")
}

struct Section {
    heading: String,
    paragraphs: [String; 2],
}

fn sections(topic: &str, language: Language) -> Vec<Section> {
    // One section per angle: search intent, root causes, execution steps,
    // case example, risk/QA, final checklist.
    match language {
        Language::Id => vec![
            Section {
                heading: format!("## Memahami intent pencarian {topic}"),
                paragraphs: [
                    format!(
                        "Sebelum menulis apa pun tentang {topic}, pahami dulu apa yang sebenarnya dicari pembaca. \
                         Sebagian besar datang dengan masalah spesifik dan ingin jawaban yang bisa langsung dipraktikkan, \
                         bukan teori panjang. Artikel ini disusun mengikuti urutan pertanyaan yang paling sering muncul, \
                         mulai dari definisi singkat sampai langkah teknis yang detail."
                    ),
                    format!(
                        "Intent pencarian juga menentukan kedalaman pembahasan. Pembaca pemula butuh konteks dasar tentang {topic}, \
                         sedangkan pembaca berpengalaman mencari pembanding dan nuansa. Keduanya dilayani di artikel ini: \
                         bagian awal memberi fondasi, bagian tengah masuk ke detail eksekusi, dan bagian akhir merangkum \
                         semuanya dalam checklist yang ringkas."
                    ),
                ],
            },
            Section {
                heading: "## Akar masalah yang sering terjadi".to_string(),
                paragraphs: [
                    format!(
                        "Kesalahan paling umum seputar {topic} jarang disebabkan kurangnya informasi, melainkan urutan \
                         pengerjaan yang keliru. Banyak orang melompat ke langkah lanjutan sebelum fondasinya siap, \
                         lalu menyimpulkan bahwa caranya tidak berhasil. Bagian ini membedah pola kegagalan itu satu per satu \
                         supaya kamu bisa mengenalinya sejak awal."
                    ),
                    format!(
                        "Akar masalah kedua adalah ekspektasi waktu. Hasil yang sehat untuk {topic} hampir selalu bertahap, \
                         dan justru perubahan yang terlalu cepat sering menandakan ada langkah yang dilewati. \
                         Dengan memahami garis waktu yang wajar, kamu bisa mengukur kemajuan tanpa panik di tengah proses."
                    ),
                ],
            },
            Section {
                heading: "## Langkah eksekusi yang terbukti".to_string(),
                paragraphs: [
                    format!(
                        "Mulailah dari langkah terkecil yang bisa diselesaikan hari ini. Untuk {topic}, itu berarti menyiapkan \
                         alat dan bahan dasar, menetapkan target mingguan yang realistis, dan mencatat kondisi awal sebagai \
                         pembanding. Catatan awal ini sering dilupakan, padahal menjadi bukti kemajuan paling objektif."
                    ),
                    format!(
                        "Setelah fondasi berjalan, naikkan intensitas secara bertahap. Setiap perubahan hanya satu variabel \
                         dalam satu waktu supaya kamu tahu persis mana yang berpengaruh pada {topic}. Dokumentasikan setiap \
                         percobaan dalam jurnal sederhana; pola yang berhasil akan terlihat dalam dua sampai tiga minggu."
                    ),
                ],
            },
            Section {
                heading: "## Contoh kasus penerapan".to_string(),
                paragraphs: [
                    format!(
                        "Ambil contoh kasus yang sering terjadi: seseorang memulai {topic} dengan semangat tinggi, \
                         mengikuti semua saran sekaligus, lalu berhenti di minggu kedua karena kewalahan. \
                         Ketika pendekatannya diganti menjadi satu kebiasaan kecil per minggu, hasilnya justru bertahan \
                         dan menumpuk dalam tiga bulan."
                    ),
                    format!(
                        "Kasus kedua menunjukkan sisi sebaliknya. Dengan target yang terlalu longgar, kemajuan {topic} \
                         tidak terasa dan motivasi ikut turun. Solusinya adalah tenggat mingguan yang jelas dan ukuran \
                         keberhasilan yang bisa dihitung, sehingga setiap minggu ada keputusan: lanjutkan, sesuaikan, \
                         atau ganti pendekatan."
                    ),
                ],
            },
            Section {
                heading: "## Risiko dan quality check".to_string(),
                paragraphs: [
                    format!(
                        "Setiap pendekatan punya risiko, termasuk untuk {topic}. Risiko paling nyata adalah informasi usang: \
                         praktik yang dulu dianjurkan bisa jadi sudah tidak relevan. Jadwalkan peninjauan berkala terhadap \
                         sumber rujukan dan bandingkan minimal dua sumber sebelum mengubah kebiasaan yang sudah berjalan."
                    ),
                    format!(
                        "Quality check sederhana: apakah langkahmu bisa dijelaskan ulang ke orang lain dalam dua kalimat? \
                         Kalau tidak, kemungkinan besar prosesnya terlalu rumit untuk dipertahankan. Sederhanakan dulu \
                         sampai lolos uji itu, baru tambahkan kompleksitas kalau memang dibutuhkan oleh {topic}."
                    ),
                ],
            },
            Section {
                heading: "## Checklist akhir sebelum publikasi".to_string(),
                paragraphs: [
                    format!(
                        "Sebelum menutup, rangkum semua poin {topic} dalam checklist: fondasi disiapkan, target mingguan \
                         ditetapkan, kondisi awal tercatat, satu variabel diubah per percobaan, dan jadwal peninjauan \
                         sumber sudah masuk kalender. Checklist ini sengaja pendek supaya benar-benar dipakai."
                    ),
                    format!(
                        "Terakhir, tetapkan kapan kamu akan mengevaluasi ulang keseluruhan proses. Tanpa titik evaluasi, \
                         kebiasaan berjalan otomatis tanpa pernah diperiksa efektivitasnya. Satu sesi tinjauan per bulan \
                         sudah cukup untuk memastikan {topic} tetap berjalan ke arah yang benar."
                    ),
                ],
            },
        ],
        Language::En => vec![
            Section {
                heading: format!("## Understanding search intent for {topic}"),
                paragraphs: [
                    format!(
                        "Before writing anything about {topic}, understand what readers actually come for. \
                         Most arrive with a specific problem and want an answer they can apply immediately, \
                         not a long theory lecture. This article follows the order in which those questions usually appear, \
                         from a short definition to detailed technical steps."
                    ),
                    format!(
                        "Search intent also sets the depth. Beginners need basic context on {topic}, while experienced \
                         readers look for comparisons and nuance. Both are served here: the opening builds the foundation, \
                         the middle goes into execution detail, and the end compresses everything into a short checklist."
                    ),
                ],
            },
            Section {
                heading: "## Root causes of common failures".to_string(),
                paragraphs: [
                    format!(
                        "The most common mistakes around {topic} rarely come from missing information; they come from \
                         doing things in the wrong order. People jump to advanced steps before the basics are in place, \
                         then conclude the method does not work. This section walks through those failure patterns \
                         so you can spot them early."
                    ),
                    format!(
                        "The second root cause is timing expectations. Healthy results with {topic} are almost always \
                         gradual, and change that arrives too fast usually means a step was skipped. Knowing the \
                         realistic timeline lets you measure progress without panicking mid-way."
                    ),
                ],
            },
            Section {
                heading: "## Execution steps that hold up".to_string(),
                paragraphs: [
                    format!(
                        "Start with the smallest step you can finish today. For {topic}, that means preparing the basic \
                         tools, setting a realistic weekly target, and recording the starting condition as a baseline. \
                         That baseline is the most objective proof of progress you will ever have."
                    ),
                    format!(
                        "Once the foundation holds, raise intensity gradually. Change one variable at a time so you know \
                         exactly what moves the needle on {topic}. Keep a simple journal of each attempt; the patterns \
                         that work become visible within two or three weeks."
                    ),
                ],
            },
            Section {
                heading: "## A worked example".to_string(),
                paragraphs: [
                    format!(
                        "Take a common case: someone starts {topic} highly motivated, applies every tip at once, \
                         and quits in week two, overwhelmed. When the approach is replaced with one small habit per week, \
                         the results hold and compound over three months."
                    ),
                    format!(
                        "The second case shows the opposite failure. With targets too loose, progress on {topic} is \
                         invisible and motivation drains. The fix is a clear weekly deadline and a countable measure of \
                         success, so every week ends with a decision: continue, adjust, or switch."
                    ),
                ],
            },
            Section {
                heading: "## Risks and quality checks".to_string(),
                paragraphs: [
                    format!(
                        "Every approach carries risk, including {topic}. The most real one is stale information: \
                         practices once recommended may no longer apply. Schedule periodic reviews of your sources and \
                         compare at least two before changing a habit that already works."
                    ),
                    format!(
                        "A simple quality check: can you explain your process to someone else in two sentences? \
                         If not, it is probably too complicated to sustain. Simplify until it passes that test, \
                         then add complexity only where {topic} genuinely demands it."
                    ),
                ],
            },
            Section {
                heading: "## Final checklist before publishing".to_string(),
                paragraphs: [
                    format!(
                        "Before closing, compress everything about {topic} into a checklist: foundation prepared, \
                         weekly target set, baseline recorded, one variable changed per attempt, and source reviews \
                         on the calendar. The list is deliberately short so it actually gets used."
                    ),
                    format!(
                        "Finally, set a date to re-evaluate the whole process. Without a review point, habits run on \
                         autopilot and are never checked for effectiveness. One review session a month is enough to keep \
                         {topic} moving in the right direction."
                    ),
                ],
            },
        ],
    }
}

fn faq_block(topic: &str, language: Language) -> String {
    match language {
        Language::Id => format!(
            "## FAQ\nQ1: Berapa lama sampai {topic} menunjukkan hasil?\nJawab: Umumnya dua sampai empat minggu untuk perubahan pertama yang terukur, asalkan langkah dasarnya konsisten dijalankan.\nQ2: Apakah {topic} butuh alat atau biaya khusus?\nJawab: Tidak harus. Mulailah dengan yang sudah ada; tambah perlengkapan hanya ketika kebutuhan spesifiknya sudah jelas.\nQ3: Apa kesalahan pertama yang harus dihindari dalam {topic}?\nJawab: Mengubah terlalu banyak hal sekaligus. Satu perubahan per minggu jauh lebih mudah dievaluasi dan dipertahankan."
        ),
        Language::En => format!(
            "## FAQ\nQ1: How long until {topic} shows results?\nAnswer: Usually two to four weeks for the first measurable change, as long as the basic steps stay consistent.\nQ2: Does {topic} require special tools or budget?\nAnswer: Not necessarily. Start with what you have and buy equipment only when a specific need is clear.\nQ3: What is the first mistake to avoid with {topic}?\nAnswer: Changing too many things at once. One change per week is far easier to evaluate and sustain."
        ),
    }
}

fn pad_paragraph(topic: &str, language: Language, index: usize) -> String {
    match language {
        Language::Id => format!(
            "Catatan tambahan ke-{n}: konsistensi mengalahkan intensitas dalam {topic}. Sesi pendek yang rutin memberi \
             hasil lebih stabil daripada usaha besar yang sesekali, karena setiap pengulangan memperkuat kebiasaan \
             dan memperkecil peluang kembali ke pola lama. Simpan catatan singkat setiap sesi supaya evaluasi bulanan \
             punya data yang jujur, bukan sekadar kesan.",
            n = index + 1
        ),
        Language::En => format!(
            "Additional note {n}: consistency beats intensity with {topic}. Short regular sessions produce steadier \
             results than occasional heroic efforts, because each repetition reinforces the habit and shrinks the \
             chance of sliding back. Keep a short note after every session so the monthly review works from honest \
             data instead of impressions.",
            n = index + 1
        ),
    }
}

fn synthesize(ctx: &RunContext, hook: &str, description: &str) -> String {
    let contract = blogger_contract();
    let topic = if ctx.topic.trim().is_empty() {
        match ctx.language {
            Language::Id => "topik ini",
            Language::En => "this topic",
        }
    } else {
        ctx.topic.trim()
    };

    let mut parts: Vec<String> = Vec::new();

    let mut intro = String::new();
    if !hook.trim().is_empty() {
        intro.push_str(hook.trim());
        intro.push(' ');
    }
    if !description.trim().is_empty() {
        intro.push_str(description.trim());
        intro.push(' ');
    }
    intro.push_str(&match ctx.language {
        Language::Id => format!(
            "Artikel ini membahas {topic} secara bertahap: dari alasan pentingnya, akar masalah yang umum, \
             sampai langkah eksekusi dan checklist yang bisa langsung dipakai."
        ),
        Language::En => format!(
            "This article covers {topic} step by step: why it matters, the common root causes, \
             and the execution steps and checklist you can apply right away."
        ),
    });
    parts.push(intro);

    for section in sections(topic, ctx.language) {
        parts.push(section.heading);
        let [first, second] = section.paragraphs;
        parts.push(first);
        parts.push(second);
    }

    parts.push(faq_block(topic, ctx.language));

    parts.push(match ctx.language {
        Language::Id => format!(
            "Kalau panduan {topic} ini membantu, bagikan ke satu orang yang sedang membutuhkannya."
        ),
        Language::En => format!(
            "If this guide to {topic} helped, share it with one person who needs it."
        ),
    });

    let mut article = parts.join("\n\n");

    let mut iterations = 0;
    while count_words(&article) < contract.min_words && iterations < MAX_PAD_ITERATIONS {
        article.push_str("\n\n");
        article.push_str(&pad_paragraph(topic, ctx.language, iterations));
        iterations += 1;
    }

    if count_words(&article) > contract.max_words {
        article = trim_words(&article, contract.max_words);
    }

    article
}

/// Normalize the narrator field into a contract-valid SEO article.
pub fn normalize_article(raw: &str, ctx: &RunContext, hook: &str, description: &str) -> ArticleOutcome {
    let contract = blogger_contract();
    let mut outcome = ArticleOutcome::default();

    let words = count_words(raw);
    let headings = count_headings(raw);
    let faqs = count_faq_items(raw);

    let structurally_valid =
        words >= contract.min_words && headings >= contract.min_headings && faqs >= contract.min_faq_items;

    if structurally_valid {
        let mut value = raw.trim().to_string();
        if words > contract.max_words {
            value = trim_words(&value, contract.max_words);
            outcome.reasons.push("article trimmed to maximum word count".to_string());
        }
        // Trimming can cut tail sections; fall back if the cut broke the
        // heading/FAQ minimums.
        if count_headings(&value) >= contract.min_headings
            && count_faq_items(&value) >= contract.min_faq_items
        {
            outcome.word_count = count_words(&value);
            outcome.heading_count = count_headings(&value);
            outcome.faq_count = count_faq_items(&value);
            outcome.value = value;
            return outcome;
        }
        outcome.reasons.push("trim broke article structure".to_string());
    } else {
        outcome.reasons.push(format!(
            "article invalid ({words} words, {headings} headings, {faqs} FAQ items), synthesized"
        ));
    }

    let value = synthesize(ctx, hook, description);
    outcome.used_fallback = true;
    outcome.word_count = count_words(&value);
    outcome.heading_count = count_headings(&value);
    outcome.faq_count = count_faq_items(&value);
    outcome.value = value;
    outcome
}
