//! 编译模块：将原始模式字符串编译为可执行的匹配模式
pub mod pattern;
pub mod compiler;

pub use self::pattern::Pattern;
pub use self::compiler::PatternCompiler;
