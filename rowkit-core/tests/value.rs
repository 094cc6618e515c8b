#[cfg(test)]
mod tests {
    use rowkit_core::{AsValue, ErrorKind, Value};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use time::macros::{date, datetime, time};
    use uuid::Uuid;

    #[test]
    fn value_none() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Float32(Some(1.0)), Value::Null);
        assert_eq!(Option::<i32>::None.as_value(), Value::Int32(None));
        assert_eq!(Option::<i32>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<String>::try_from_value(Value::Varchar(None)).unwrap(),
            None
        );
        assert_eq!(
            Option::<i64>::try_from_value(Value::Int32(Some(5))).unwrap(),
            Some(5)
        );
    }

    #[test]
    fn value_bool() {
        let val: Value = true.into();
        assert_eq!(val, Value::Boolean(Some(true)));
        assert_ne!(val, Value::Varchar(Some("true".into())));
        assert_eq!(bool::try_from_value(val).unwrap(), true);
        assert_eq!(bool::try_from_value((1 as i8).into()).unwrap(), true);
        assert_eq!(bool::try_from_value((0 as i64).into()).unwrap(), false);
        assert_eq!(bool::try_from_value((2 as u16).into()).unwrap(), true);
        assert_eq!(bool::try_from_value("true".into()).unwrap(), true);
        assert_eq!(bool::try_from_value("FALSE".into()).unwrap(), false);
        assert_eq!(bool::try_from_value("0".into()).unwrap(), false);
        assert!(bool::try_from_value("maybe".into()).is_err());
        assert!(bool::try_from_value((0.5 as f32).into()).is_err());
    }

    #[test]
    fn value_integers() {
        assert_eq!(i32::try_from_value(Value::Int64(Some(42))).unwrap(), 42);
        assert_eq!(i64::try_from_value(Value::UInt32(Some(7))).unwrap(), 7);
        assert_eq!(u8::try_from_value(Value::Int16(Some(255))).unwrap(), 255);
        assert!(u8::try_from_value(Value::Int16(Some(256))).is_err());
        assert!(u32::try_from_value(Value::Int8(Some(-1))).is_err());
        assert!(i8::try_from_value(Value::Int64(Some(i64::MAX))).is_err());
        assert!(i32::try_from_value(Value::Float64(Some(1.0))).is_err());
        assert!(i32::try_from_value("12".into()).is_err());
        let error = i16::try_from_value(Value::Int32(Some(70000))).unwrap_err();
        assert!(error.to_string().contains("out of range"));
    }

    #[test]
    fn value_floats() {
        assert_eq!(f64::try_from_value(Value::Float32(Some(0.5))).unwrap(), 0.5);
        assert_eq!(f64::try_from_value(Value::Int32(Some(-3))).unwrap(), -3.0);
        assert_eq!(
            f64::try_from_value(Value::Int64(Some(1 << 53))).unwrap(),
            9007199254740992.0
        );
        assert!(f64::try_from_value(Value::Int64(Some((1 << 53) + 1))).is_err());
        assert_eq!(f32::try_from_value(Value::Float64(Some(2.25))).unwrap(), 2.25);
        assert_eq!(f32::try_from_value(Value::UInt16(Some(9))).unwrap(), 9.0);
        assert!(f32::try_from_value(Value::Float64(Some(1e300))).is_err());
        assert_eq!(
            f32::try_from_value(Value::Float64(Some(0.1f32 as f64))).unwrap(),
            0.1
        );
        // Shortest text of an f32 read back as a double
        assert_eq!(f32::try_from_value(Value::Float64(Some(0.1))).unwrap(), 0.1);
        assert_eq!(f32::try_from_value(Value::Float64(Some(-3.4e38))).unwrap(), -3.4e38);
        assert!(f32::try_from_value(Value::Float64(Some(0.123456789))).is_err());
        assert!(f32::try_from_value(Value::Float64(Some(16777217.0))).is_err());
        assert_eq!(
            f32::try_from_value(Value::Float64(Some(f64::INFINITY))).unwrap(),
            f32::INFINITY
        );
        assert!(f32::try_from_value(Value::Float64(Some(f64::NAN))).unwrap().is_nan());
        assert!(f32::try_from_value(Value::Int32(Some(i32::MAX))).is_err());
        assert_eq!(
            f64::try_from_value(Value::Decimal(Some(Decimal::from_str("1.25").unwrap())))
                .unwrap(),
            1.25
        );
        assert!(f64::try_from_value(Value::Boolean(Some(true))).is_err());
    }

    #[test]
    fn value_decimal() {
        let dec = Decimal::from_str("12.340").unwrap();
        assert_eq!(Decimal::try_from_value(dec.as_value()).unwrap(), dec);
        assert_eq!(
            Decimal::try_from_value(Value::Int64(Some(12))).unwrap(),
            Decimal::from(12)
        );
        assert_eq!(
            Decimal::try_from_value("-0.5".into()).unwrap(),
            Decimal::from_str("-0.5").unwrap()
        );
        assert!(Decimal::try_from_value("half".into()).is_err());
        assert!(Decimal::try_from_value(Value::Float64(Some(f64::NAN))).is_err());
    }

    #[test]
    fn value_text() {
        assert_eq!(
            String::try_from_value("Ann".into()).unwrap(),
            String::from("Ann")
        );
        assert_eq!(String::try_from_value(Value::Char(Some('x'))).unwrap(), "x");
        assert!(String::try_from_value(Value::Int32(Some(1))).is_err());
        assert_eq!(char::try_from_value("é".into()).unwrap(), 'é');
        assert!(char::try_from_value("ab".into()).is_err());
        assert!(char::try_from_value("".into()).is_err());
        let blob: Box<[u8]> = [1u8, 2, 3].into();
        assert_eq!(
            Box::<[u8]>::try_from_value(blob.clone().as_value()).unwrap(),
            blob
        );
    }

    #[test]
    fn value_uuid() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(Uuid::try_from_value(id.as_value()).unwrap(), id);
        assert_eq!(
            Uuid::try_from_value("67e55044-10b1-426f-9247-bb680e5fe0c8".into()).unwrap(),
            id
        );
        assert_eq!(
            Uuid::try_from_value("{67e55044-10b1-426f-9247-bb680e5fe0c8}".into()).unwrap(),
            id
        );
        assert_eq!(
            Uuid::try_from_value(Value::Blob(Some(id.as_bytes().to_vec().into()))).unwrap(),
            id
        );
        assert!(Uuid::try_from_value("not a uuid".into()).is_err());
    }

    #[test]
    fn value_temporal() {
        assert_eq!(
            time::Date::try_from_value("2024-02-29".into()).unwrap(),
            date!(2024 - 02 - 29)
        );
        assert_eq!(
            time::Time::try_from_value("23:59:58".into()).unwrap(),
            time!(23:59:58)
        );
        assert_eq!(
            time::Time::try_from_value("08:00:00.5".into()).unwrap(),
            time!(08:00:00.5)
        );
        assert_eq!(
            time::PrimitiveDateTime::try_from_value("2001-02-03 04:05:06".into()).unwrap(),
            datetime!(2001-02-03 04:05:06)
        );
        assert_eq!(
            time::PrimitiveDateTime::try_from_value("2001-02-03T04:05:06.25".into()).unwrap(),
            datetime!(2001-02-03 04:05:06.25)
        );
        assert!(time::Date::try_from_value("03/02/2001".into()).is_err());
        assert!(time::Date::try_from_value(Value::Int32(Some(1))).is_err());
    }

    #[test]
    fn conversion_errors_are_not_classified() {
        let error = i32::try_from_value(Value::Varchar(Some("x".into()))).unwrap_err();
        assert_eq!(ErrorKind::of(&error), None);
        assert!(error.to_string().contains("i32"));
    }
}
