/// 初始化全局日志输出，级别取自 SysConfig.log_level
///
/// 重复调用安全（测试里各用例都可调用）
pub fn init_log(level: &str) {
    let _ = env_logger::Builder::new().parse_filters(level).try_init();
}
