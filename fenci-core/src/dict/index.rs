//! 词典索引
//!
//! 持有 Trie 与词条表的长生命周期聚合体：负责主词典装载、词频到
//! 对数概率的规整化，以及用户词典带变更检测的热加载。
//!
//! 并发模型是写时复制：已发布的快照一律不可变，读方克隆一个 `Arc`
//! 就能在自己的快照上做任意多次一致的查询；写方（热加载、追加词条）
//! 在独立的重载锁里串行执行，整文件解析通过后才克隆、改写、整体替换
//! 引用。失败的装载不会在索引上留下任何痕迹。

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Instant, SystemTime};

use crate::config::DictConfig;
use crate::dict::loader::{DictParser, RawEntry, WordEntry};
use crate::dict::normalize::canonical;
use crate::dict::trie::Trie;
use crate::error::{FenciError, FenciResult};

/// 构建时嵌入的主词典
static MAIN_DICT: &str = include_str!("data/dict.txt");

/// 用户词典文件的识别后缀
pub const USER_DICT_SUFFIX: &str = ".dict";

/// 词典快照
///
/// 一经发布即不可变。同一个快照上的多次查询之间不会观察到任何
/// 并发重载的影响，适合分词这类"一句话内多次查词必须一致"的消费方。
#[derive(Debug, Clone)]
pub struct DictSnapshot {
    trie: Trie,
    words: HashMap<String, WordEntry>,
    /// 主词典装载累计的原始词频总和，是权重换算的固定分母
    total: f64,
    /// 全词典最低权重，用作未登录词的回退评分
    min_score: f64,
}

impl DictSnapshot {
    fn empty() -> Self {
        Self {
            trie: Trie::new(),
            words: HashMap::new(),
            total: 0.0,
            min_score: f64::MAX,
        }
    }

    /// 按规范文本查询词条
    pub fn lookup(&self, word: &str) -> Option<&WordEntry> {
        self.words.get(word)
    }

    /// 是否包含指定规范文本的词条
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// 词条权重；未登录词回退到全词典最低权重
    pub fn score_of(&self, word: &str) -> f64 {
        self.words.get(word).map(|e| e.score).unwrap_or(self.min_score)
    }

    /// 前缀树，供下游分词算法逐字遍历
    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// 规整化纪元固定下来的词频总和
    pub fn total(&self) -> f64 {
        self.total
    }

    /// 未登录词的回退权重
    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    /// 主词典装载：进 Trie、累计总词频，score 暂存原始词频
    ///
    /// 同一个词出现多次时词条后者覆盖前者，但每行词频都计入总和。
    fn apply_base(&mut self, entries: Vec<RawEntry>) {
        for raw in entries {
            let word = self.trie.insert(&raw.word);
            self.total += raw.freq;
            self.words.insert(
                word.clone(),
                WordEntry {
                    word,
                    score: raw.freq,
                    tag: raw.tag,
                },
            );
        }
    }

    /// 规整化扫描：原始词频一次性换算成对数概率 `ln(freq / total)`
    ///
    /// 只在主词典装载完成后执行一次，此后 `total` 不再变化，
    /// 后续所有用户词条都按同一分母换算，权重之间才有可比性。
    fn normalize(&mut self) {
        for entry in self.words.values_mut() {
            entry.score = (entry.score / self.total).ln();
            if entry.score < self.min_score {
                self.min_score = entry.score;
            }
        }
    }

    /// 用户词条写入：按已固定的 `total` 逐条换算权重，词条覆盖同名旧值
    fn apply_user(&mut self, entries: Vec<RawEntry>) -> usize {
        let count = entries.len();
        for raw in entries {
            let word = self.trie.insert(&raw.word);
            let score = (raw.freq / self.total).ln();
            self.words.insert(
                word.clone(),
                WordEntry {
                    word,
                    score,
                    tag: raw.tag,
                },
            );
        }
        count
    }
}

/// 词典索引
///
/// 读路径：`snapshot()` 在极短的读锁内克隆当前快照的 `Arc`，
/// 之后的查询完全无锁。写路径：重载锁贯穿"变更检测、解析、克隆、
/// 替换"全程，写与写之间串行，与读之间只在替换引用的一瞬间互斥。
#[derive(Debug)]
pub struct WordDict {
    /// 当前已发布快照
    state: RwLock<Arc<DictSnapshot>>,
    /// 写路径串行化锁；映射记录每个用户词典最近一次成功装载的修改时间
    reload: Mutex<HashMap<PathBuf, SystemTime>>,
    /// 用户词典目录扫描的一次性保护
    init_once: Mutex<bool>,
}

impl WordDict {
    /// 装载嵌入的主词典并构建索引
    ///
    /// 进程启动时调用一次。任何失败都是致命的初始化错误：
    /// 规整化没有跑完的索引绝不对外发布。
    pub fn new() -> FenciResult<Self> {
        Self::from_reader(Cursor::new(MAIN_DICT))
    }

    /// 从调用方提供的字节流装载主词典
    ///
    /// 独立部署自带词典、以及测试构造小词典时使用。
    pub fn from_reader<R: BufRead>(reader: R) -> FenciResult<Self> {
        let start = Instant::now();
        let entries = DictParser::parse(reader).map_err(|e| FenciError::MainDictLoad {
            reason: e.to_string(),
        })?;

        let mut snapshot = DictSnapshot::empty();
        snapshot.apply_base(entries);
        snapshot.normalize();

        tracing::info!(
            "主词典装载完成: {} 个词条, 总词频 {}, 耗时 {} ms",
            snapshot.word_count(),
            snapshot.total,
            start.elapsed().as_millis()
        );
        Ok(Self {
            state: RwLock::new(Arc::new(snapshot)),
            reload: Mutex::new(HashMap::new()),
            init_once: Mutex::new(false),
        })
    }

    /// 取当前快照
    ///
    /// 克隆出的 `Arc` 与后续重载互不干扰，一句话内的多次查词
    /// 应复用同一个快照。
    pub fn snapshot(&self) -> Arc<DictSnapshot> {
        self.state.read().unwrap().clone()
    }

    /// 原子替换已发布快照，写锁内只有一次指针赋值
    fn publish(&self, next: DictSnapshot) {
        *self.state.write().unwrap() = Arc::new(next);
    }

    /// 装载或热重载一个用户词典文件，返回本次写入的词条数
    ///
    /// - 文件不存在：返回可恢复的 `UserDictNotFound`，索引不变
    /// - 修改时间与上次成功装载一致：跳过重解析，返回 `Ok(0)`
    /// - 解析失败：整个文件不落地，索引保持原状；修改时间不记录，
    ///   文件修好之前的每次调用都会重试
    pub fn load_user_dict(&self, path: &Path) -> FenciResult<usize> {
        if !path.exists() {
            tracing::warn!("用户词典不存在: {}", path.display());
            return Err(FenciError::UserDictNotFound(path.display().to_string()));
        }

        let start = Instant::now();
        let mut reload = self.reload.lock().unwrap();

        let mtime = std::fs::metadata(path)?.modified()?;
        if reload.get(path) == Some(&mtime) {
            tracing::debug!("用户词典未变更, 跳过: {}", path.display());
            return Ok(0);
        }

        let file = File::open(path)?;
        let entries = DictParser::parse(BufReader::new(file))?;

        let mut next = (*self.snapshot()).clone();
        let count = next.apply_user(entries);
        self.publish(next);

        reload.insert(path.to_path_buf(), mtime);
        tracing::info!(
            "用户词典装载完成: {} ({} 个词条, 耗时 {} ms)",
            path.display(),
            count,
            start.elapsed().as_millis()
        );
        Ok(count)
    }

    /// 扫描目录并装载其中所有 `.dict` 用户词典（非递归）
    ///
    /// 进程生命周期内只扫描一次，之后的调用直接返回 `Ok(0)`；
    /// 目录读取失败不计入"已扫描"，下次调用会重试。
    /// 返回累计写入的词条数。
    pub fn init_user_dicts(&self, dir: &Path) -> FenciResult<usize> {
        self.init_dir(dir, USER_DICT_SUFFIX)
    }

    /// 按配置装载用户词典目录
    pub fn init_from_config(&self, config: &DictConfig) -> FenciResult<usize> {
        let dir = config.resolve_user_dict_dir()?;
        self.init_dir(&dir, &config.user_dict_suffix)
    }

    fn init_dir(&self, dir: &Path, suffix: &str) -> FenciResult<usize> {
        let mut initialized = self.init_once.lock().unwrap();
        if *initialized {
            tracing::debug!("用户词典目录已初始化, 跳过: {}", dir.display());
            return Ok(0);
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.ends_with(suffix))
            })
            .collect();
        // 按文件名排序，跨文件的同名词条覆盖顺序才可复现
        paths.sort();

        let mut loaded = 0;
        for path in &paths {
            match self.load_user_dict(path) {
                Ok(count) => loaded += count,
                Err(e) => {
                    tracing::warn!("用户词典装载失败: {} - {}", path.display(), e);
                }
            }
        }
        *initialized = true;

        tracing::info!(
            "用户词典目录初始化完成: {} ({} 个文件, {} 个词条)",
            dir.display(),
            paths.len(),
            loaded
        );
        Ok(loaded)
    }

    /// 运行期追加单个词条，返回其规范文本
    ///
    /// 权重按规整化纪元固定的 `total` 换算，与词典文件里的同词频
    /// 词条得到完全相同的评分。
    pub fn add_word(&self, word: &str, freq: f64, tag: &str) -> FenciResult<String> {
        if !freq.is_finite() || freq < 0.0 {
            return Err(FenciError::InvalidWordFrequency {
                word: word.to_string(),
                value: freq,
            });
        }

        let _reload = self.reload.lock().unwrap();
        let mut next = (*self.snapshot()).clone();
        next.apply_user(vec![RawEntry {
            word: word.to_string(),
            freq,
            tag: tag.to_string(),
        }]);
        self.publish(next);

        let word = canonical(word);
        tracing::debug!("追加词条: {} (词频 {})", word, freq);
        Ok(word)
    }

    /// 按规范文本查询词条（单次查询的便捷入口）
    pub fn lookup(&self, word: &str) -> Option<WordEntry> {
        self.snapshot().lookup(word).cloned()
    }

    /// 是否包含指定规范文本的词条
    pub fn contains(&self, word: &str) -> bool {
        self.snapshot().contains(word)
    }

    /// 词条权重；未登录词回退到全词典最低权重
    pub fn score_of(&self, word: &str) -> f64 {
        self.snapshot().score_of(word)
    }

    pub fn word_count(&self) -> usize {
        self.snapshot().word_count()
    }

    pub fn min_score(&self) -> f64 {
        self.snapshot().min_score()
    }

    pub fn total(&self) -> f64 {
        self.snapshot().total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_dict() -> WordDict {
        WordDict::from_reader(Cursor::new("中文 10 n\n文 5 n\n")).unwrap()
    }

    #[test]
    fn test_base_load_scores() {
        let dict = small_dict();

        assert_eq!(dict.word_count(), 2);
        assert_eq!(dict.total(), 15.0);
        assert_eq!(dict.score_of("中文"), (10.0f64 / 15.0).ln());
        assert_eq!(dict.score_of("文"), (5.0f64 / 15.0).ln());
        assert_eq!(dict.min_score(), (5.0f64 / 15.0).ln());
    }

    #[test]
    fn test_unknown_word_fallback() {
        let dict = small_dict();

        assert!(!dict.contains("未登录"));
        assert!(dict.lookup("未登录").is_none());
        assert_eq!(dict.score_of("未登录"), (5.0f64 / 15.0).ln());
    }

    #[test]
    fn test_lookup_entry_fields() {
        let dict = small_dict();

        let entry = dict.lookup("中文").unwrap();
        assert_eq!(entry.word, "中文");
        assert_eq!(entry.tag, "n");
        assert_eq!(entry.score, (10.0f64 / 15.0).ln());
    }

    #[test]
    fn test_base_canonicalizes_words() {
        let dict = WordDict::from_reader(Cursor::new("ＡＢＣ 10 eng\nDEF 5 eng\n")).unwrap();

        assert!(dict.contains("abc"));
        assert!(dict.contains("def"));
        assert!(!dict.contains("ABC"));
        let entry = dict.lookup("abc").unwrap();
        assert_eq!(entry.word, "abc");
    }

    #[test]
    fn test_duplicate_base_word() {
        // 词条后者覆盖前者，总词频照单全收
        let dict =
            WordDict::from_reader(Cursor::new("重复 10 n\n重复 20 v\n单 30 n\n")).unwrap();

        assert_eq!(dict.word_count(), 2);
        assert_eq!(dict.total(), 60.0);
        let entry = dict.lookup("重复").unwrap();
        assert_eq!(entry.tag, "v");
        assert_eq!(entry.score, (20.0f64 / 60.0).ln());
    }

    #[test]
    fn test_base_load_rejects_bad_file() {
        let err = WordDict::from_reader(Cursor::new("中文 10 n\n坏 x n\n")).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, FenciError::MainDictLoad { .. }));
    }

    #[test]
    fn test_add_word_uses_fixed_total() {
        let dict = small_dict();

        let word = dict.add_word("新词", 10.0, "nz").unwrap();
        assert_eq!(word, "新词");
        // 与主词典里同词频的词条评分完全一致，total 不因追加而变化
        assert_eq!(dict.score_of("新词"), dict.score_of("中文"));
        assert_eq!(dict.total(), 15.0);
        assert_eq!(dict.word_count(), 3);
    }

    #[test]
    fn test_add_word_canonicalizes() {
        let dict = small_dict();

        let word = dict.add_word("ＡＢＣ", 5.0, "eng").unwrap();
        assert_eq!(word, "abc");
        assert!(dict.contains("abc"));
        assert!(dict.snapshot().trie().contains("ABC"));
    }

    #[test]
    fn test_add_word_rejects_bad_freq() {
        let dict = small_dict();

        assert!(dict.add_word("坏", -1.0, "n").is_err());
        assert!(dict.add_word("坏", f64::NAN, "n").is_err());
        assert!(!dict.contains("坏"));
        assert_eq!(dict.word_count(), 2);
    }

    #[test]
    fn test_snapshot_isolated_from_reload() {
        let dict = small_dict();
        let before = dict.snapshot();

        dict.add_word("新词", 10.0, "nz").unwrap();

        // 旧快照保持原样，新快照看到追加的词条
        assert!(!before.contains("新词"));
        assert_eq!(before.word_count(), 2);
        assert!(dict.snapshot().contains("新词"));
    }

    #[test]
    fn test_embedded_main_dict() {
        let dict = WordDict::new().unwrap();

        assert!(dict.word_count() > 100);
        assert!(dict.contains("中文"));
        assert!(dict.contains("南京市"));
        // 权重已经是对数概率，全部为负
        assert!(dict.score_of("中文") < 0.0);
        assert!(dict.min_score() < 0.0);
    }

    #[test]
    fn test_trie_walk_on_snapshot() {
        let dict = WordDict::from_reader(Cursor::new(
            "南京 100 ns\n南京市 50 ns\n市长 30 n\n长江大桥 20 ns\n",
        ))
        .unwrap();
        let snapshot = dict.snapshot();
        let chars: Vec<char> = "南京市长江大桥".chars().collect();

        let ends: Vec<usize> = snapshot.trie().common_prefix_iter(&chars, 0).collect();
        assert_eq!(ends, vec![2, 3]);
        let ends: Vec<usize> = snapshot.trie().common_prefix_iter(&chars, 2).collect();
        assert_eq!(ends, vec![4]);
        let ends: Vec<usize> = snapshot.trie().common_prefix_iter(&chars, 3).collect();
        assert_eq!(ends, vec![7]);
    }

    #[test]
    fn test_zero_frequency_word() {
        let dict = WordDict::from_reader(Cursor::new("中文 10 n\n罕见 0 n\n")).unwrap();

        assert!(dict.contains("罕见"));
        assert_eq!(dict.score_of("罕见"), f64::NEG_INFINITY);
        assert_eq!(dict.min_score(), f64::NEG_INFINITY);
    }
}
