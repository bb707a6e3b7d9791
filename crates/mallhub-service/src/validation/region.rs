//! Administrative division codes accepted in addresses (GB/T 2260).

use std::collections::HashMap;
use std::sync::LazyLock;

use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;

/// Province-level codes.
pub static PROVINCE_CODES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("110000", "北京市"),
        ("120000", "天津市"),
        ("310000", "上海市"),
        ("320000", "江苏省"),
        ("330000", "浙江省"),
        ("440000", "广东省"),
        ("500000", "重庆市"),
        ("510000", "四川省"),
    ])
});

/// City-level codes.
pub static CITY_CODES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("110100", "北京市"),
        ("120100", "天津市"),
        ("310100", "上海市"),
        ("320100", "南京市"),
        ("320500", "苏州市"),
        ("330100", "杭州市"),
        ("330200", "宁波市"),
        ("440100", "广州市"),
        ("440300", "深圳市"),
        ("500100", "重庆市"),
        ("510100", "成都市"),
    ])
});

/// Area-level codes.
pub static AREA_CODES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("110101", "东城区"),
        ("110102", "西城区"),
        ("110105", "朝阳区"),
        ("110108", "海淀区"),
        ("120101", "和平区"),
        ("310101", "黄浦区"),
        ("310104", "徐汇区"),
        ("310115", "浦东新区"),
        ("320102", "玄武区"),
        ("320505", "虎丘区"),
        ("330102", "上城区"),
        ("330106", "西湖区"),
        ("330203", "海曙区"),
        ("440103", "荔湾区"),
        ("440106", "天河区"),
        ("440304", "福田区"),
        ("440305", "南山区"),
        ("500103", "渝中区"),
        ("510104", "锦江区"),
        ("510107", "武侯区"),
    ])
});

/// Check a province code against the whitelist.
pub fn check_province(code: &str) -> AppResult<()> {
    check(&PROVINCE_CODES, code, "invalid province code")
}

/// Check a city code against the whitelist.
pub fn check_city(code: &str) -> AppResult<()> {
    check(&CITY_CODES, code, "invalid city code")
}

/// Check an area code against the whitelist.
pub fn check_area(code: &str) -> AppResult<()> {
    check(&AREA_CODES, code, "invalid area code")
}

fn check(table: &HashMap<&'static str, &'static str>, code: &str, message: &str) -> AppResult<()> {
    if table.contains_key(code) {
        Ok(())
    } else {
        Err(AppError::invalid_params(message))
    }
}
