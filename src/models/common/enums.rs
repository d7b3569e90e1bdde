/// 定义以字符串存储的枚举
///
/// 自动生成：
/// - `as_str()` 与 `variants()`
/// - Display / FromStr
/// - 带中文错误提示的 Deserialize
/// - 与数据库字符串一致的 Serialize 与 TS 定义
#[macro_export]
macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($label:literal) {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, ts_rs::TS)]
        $(#[$meta])*
        $vis enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            pub fn variants() -> &'static [$name] {
                &[$($name::$variant),+]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {s}", stringify!($name))),
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(|_| {
                    let supported: Vec<&str> = $name::variants().iter().map(|v| v.as_str()).collect();
                    serde::de::Error::custom(format!(
                        "无效的{}: '{s}'. 支持的值: {}",
                        $label,
                        supported.join(", ")
                    ))
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::define_string_enum! {
        enum Color("颜色") {
            Red => "red",
            DarkBlue => "dark_blue",
        }
    }

    #[test]
    fn test_round_trip_strings() {
        assert_eq!(Color::DarkBlue.to_string(), "dark_blue");
        assert_eq!("red".parse::<Color>(), Ok(Color::Red));
        assert!("green".parse::<Color>().is_err());
        assert_eq!(Color::variants().len(), 2);
    }

    #[test]
    fn test_deserialize_error_lists_supported_values() {
        let err = serde_json::from_str::<Color>("\"green\"").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("颜色"));
        assert!(msg.contains("red, dark_blue"));

        let ok: Color = serde_json::from_str("\"dark_blue\"").unwrap();
        assert_eq!(ok, Color::DarkBlue);
        assert_eq!(serde_json::to_string(&Color::Red).unwrap(), "\"red\"");
    }
}
