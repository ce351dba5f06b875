//! `date`/`date-time` grammar (RFC 3501 §9, `Envelope`'s `env-date` field is a bare `nstring`, not
//! parsed here).

use nom::{
    branch::alt,
    character::streaming::{char, one_of},
    combinator::{map, map_res, opt},
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};

use imap_wire_types::datetime::{Date, InternalDate};

use super::core::{month, sp};

fn two_digit(input: &[u8]) -> IResult<&[u8], u8> {
    map_res(
        nom::bytes::streaming::take_while_m_n(2, 2, |b: u8| b.is_ascii_digit()),
        |bytes: &[u8]| std::str::from_utf8(bytes).unwrap().parse::<u8>(),
    )(input)
}

fn one_or_two_digit(input: &[u8]) -> IResult<&[u8], u8> {
    map_res(
        nom::bytes::streaming::take_while_m_n(1, 2, |b: u8| b.is_ascii_digit()),
        |bytes: &[u8]| std::str::from_utf8(bytes).unwrap().parse::<u8>(),
    )(input)
}

fn four_digit_year(input: &[u8]) -> IResult<&[u8], u16> {
    map_res(
        nom::bytes::streaming::take_while_m_n(4, 4, |b: u8| b.is_ascii_digit()),
        |bytes: &[u8]| std::str::from_utf8(bytes).unwrap().parse::<u16>(),
    )(input)
}

/// `date-day-fixed "-" date-month "-" date-year`, the unquoted form used inside `date-time`.
fn date_day_month_year(input: &[u8]) -> IResult<&[u8], (u8, u8, u16)> {
    map(
        tuple((
            delimited(opt(char(' ')), one_or_two_digit, char('-')),
            terminated(month, char('-')),
            four_digit_year,
        )),
        |(day, month, year)| (day, month, year),
    )(input)
}

/// `date = date-text / DQUOTE date-text DQUOTE`
pub(crate) fn date(input: &[u8]) -> IResult<&[u8], Date> {
    map_res(
        alt((date_day_month_year, delimited(char('"'), date_day_month_year, char('"')))),
        |(day, month, year)| Date::new(year, month, day),
    )(input)
}

/// `zone = ("+" / "-") 4DIGIT`
fn zone(input: &[u8]) -> IResult<&[u8], i16> {
    map(
        tuple((one_of("+-"), two_digit, two_digit)),
        |(sign, hours, minutes)| {
            let magnitude = hours as i16 * 60 + minutes as i16;
            if sign == '-' {
                -magnitude
            } else {
                magnitude
            }
        },
    )(input)
}

/// `time = 2DIGIT ":" 2DIGIT ":" 2DIGIT`
fn time(input: &[u8]) -> IResult<&[u8], (u8, u8, u8)> {
    map(
        tuple((two_digit, preceded(char(':'), two_digit), preceded(char(':'), two_digit))),
        |(h, m, s)| (h, m, s),
    )(input)
}

/// `date-time = DQUOTE date-day-fixed "-" date-month "-" date-year SP time SP zone DQUOTE`
pub(crate) fn date_time(input: &[u8]) -> IResult<&[u8], InternalDate> {
    map_res(
        delimited(
            char('"'),
            tuple((date_day_month_year, sp, time, sp, zone)),
            char('"'),
        ),
        |((day, month, year), _, (hour, minute, second), _, zone_offset_minutes)| {
            InternalDate::new(year, month, day, hour, minute, second, zone_offset_minutes)
        },
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::known_answer_test_parse;

    #[test]
    fn test_date() {
        known_answer_test_parse((b"1-Jan-1985xxx", b"xxx".as_slice(), Date::new(1985, 1, 1).unwrap()), date);
    }

    #[test]
    fn test_date_time() {
        let (rem, got) = date_time(br#""25-Jun-1994 01:02:03 +0000"xxx"#).unwrap();
        assert_eq!(rem, b"xxx");
        assert_eq!(got, InternalDate::new(1994, 6, 25, 1, 2, 3, 0).unwrap());
    }

    #[test]
    fn test_date_time_negative_zone() {
        let (rem, got) = date_time(br#""25-Jun-1994 01:02:03 -0800"xxx"#).unwrap();
        assert_eq!(rem, b"xxx");
        assert_eq!(got, InternalDate::new(1994, 6, 25, 1, 2, 3, -480).unwrap());
    }
}
