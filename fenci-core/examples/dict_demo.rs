//! 词典索引演示程序
//!
//! 装载嵌入主词典，演示查询、逐字前缀匹配和用户词典热加载
//!
//! 用法：
//!   cargo run --example dict_demo
//!   cargo run --example dict_demo -- path/to/user.dict

use std::env;
use std::path::Path;

use fenci_core::{FenciResult, WordDict};

fn main() -> FenciResult<()> {
    fenci_core::init_logging();

    println!("=== Fenci 词典索引演示 ===\n");

    let dict = WordDict::new()?;
    println!("词条总数: {}", dict.word_count());
    println!("未登录词回退权重: {:.4}\n", dict.min_score());

    // 可选：装载一个用户词典
    if let Some(path) = env::args().nth(1) {
        let count = dict.load_user_dict(Path::new(&path))?;
        println!("用户词典 {} 装载了 {} 个词条\n", path, count);
    }

    // 查询演示
    println!("【词条查询】\n");
    let snapshot = dict.snapshot();
    for word in ["中文", "分词", "自然语言", "不存在的词"] {
        match snapshot.lookup(word) {
            Some(entry) => {
                println!("{:<12} score={:<9.4} tag={}", entry.word, entry.score, entry.tag);
            }
            None => {
                println!("{:<12} 未登录, 回退 score={:.4}", word, snapshot.score_of(word));
            }
        }
    }

    // 逐字前缀匹配演示：列出句子每个起点上所有的词典词
    println!("\n【公共前缀匹配】\n");
    let sentence = "南京市长江大桥";
    let chars: Vec<char> = sentence.chars().collect();
    println!("句子: {}\n", sentence);
    for start in 0..chars.len() {
        let words: Vec<String> = snapshot
            .trie()
            .common_prefix_iter(&chars, start)
            .map(|end| chars[start..end].iter().collect())
            .collect();
        if !words.is_empty() {
            println!("  起点 {} ({}): {}", start, chars[start], words.join(" / "));
        }
    }

    // 运行期追加词条
    println!("\n【追加词条】\n");
    let word = dict.add_word("江大桥", 3.0, "nr")?;
    println!("追加 \"{}\" 后:", word);
    let snapshot = dict.snapshot();
    let words: Vec<String> = snapshot
        .trie()
        .common_prefix_iter(&chars, 4)
        .map(|end| chars[4..end].iter().collect())
        .collect();
    println!("  起点 4 ({}): {}", chars[4], words.join(" / "));

    println!("\n=== 演示完成 ===");
    Ok(())
}
