// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

#[cfg(test)]
mod serde_utils_tests {
    use std::num::ParseIntError;
    use std::str::FromStr;

    #[derive(Debug, PartialEq)]
    struct Even(u32);

    impl FromStr for Even {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let n: u32 = s.parse().map_err(|e: ParseIntError| e.to_string())?;
            if n % 2 == 0 {
                Ok(Self(n))
            } else {
                Err(format!("{n} is odd"))
            }
        }
    }

    impl std::fmt::Display for Even {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    crate::serde_str!(Even);

    #[test]
    fn serde_str_validates() {
        let json = serde_json::to_string(&Even(4)).expect("serialize");
        assert_eq!(json, "\"4\"");
        let back: Even = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Even(4));
        let odd = serde_json::from_str::<Even>("\"5\"");
        println!("odd: {odd:?}");
        assert!(odd.is_err());
    }
}
