/// 判断 n 是否为正的 2 的幂
/// 用位运算而不是浮点除法，避免大数精度问题。
pub fn is_power_of_two(n: i64) -> bool {
    n > 0 && (n & (n - 1)) == 0
}
