use arcstr::ArcStr;
use indexmap::IndexMap;

use crate::{
    ast::{
        Argument, Arguments, Definition, DeprecationStatus, Directive, Document,
        EnumTypeDefinition, EnumValueDefinition, Field, FieldDefinition, FieldDefinitions,
        Fragment, FragmentSpread, InlineFragment, InputObjectTypeDefinition, InputValue,
        InputValueDefinition, InputValueDefinitions, InterfaceTypeDefinition,
        ObjectTypeDefinition, Operation, OperationType, ScalarTypeDefinition, Selection, Type,
        TypeExtensionDefinition, UnionTypeDefinition, VariableDefinition, VariableDefinitions,
    },
    parser::{
        Keyword, Lexer, OptionParseResult, ParseError, ParseResult, Parser, Span, Spanning,
        Token, UnlocatedParseResult, value::parse_value_literal,
    },
};

/// Parses `s` into a [`Document`], building its indices.
///
/// Both the query language and the schema language are accepted, and may be
/// mixed in a single source.
pub fn parse_document_source(s: &str) -> UnlocatedParseResult<Document> {
    let mut lexer = Lexer::new(s);
    let mut parser = Parser::new(&mut lexer).map_err(|s| s.map(ParseError::LexerError))?;
    parse_document(&mut parser)
}

fn parse_document(parser: &mut Parser<'_>) -> UnlocatedParseResult<Document> {
    let start = parser.peek().span.start;
    let mut defs = Vec::new();

    loop {
        defs.push(parse_definition(parser)?);

        if parser.peek().item == Token::EndOfFile {
            let end = parser.peek().span.end;
            return Document::new(defs, Span { start, end });
        }
    }
}

fn parse_definition(parser: &mut Parser<'_>) -> UnlocatedParseResult<Definition> {
    let description = parser.take_description();

    match parser.peek().item {
        Token::CurlyOpen | Token::Keyword(Keyword::Query | Keyword::Mutation) => {
            Ok(Definition::Operation(parse_operation_definition(parser)?))
        }
        Token::Keyword(Keyword::Fragment) => {
            Ok(Definition::Fragment(parse_fragment_definition(parser)?))
        }
        Token::Keyword(Keyword::Type) => Ok(Definition::Object(parse_object_type_definition(
            parser,
            description,
        )?)),
        Token::Keyword(Keyword::Interface) => Ok(Definition::Interface(
            parse_interface_type_definition(parser, description)?,
        )),
        Token::Keyword(Keyword::Union) => Ok(Definition::Union(parse_union_type_definition(
            parser,
            description,
        )?)),
        Token::Keyword(Keyword::Scalar) => Ok(Definition::Scalar(
            parse_scalar_type_definition(parser, description)?,
        )),
        Token::Keyword(Keyword::Enum) => Ok(Definition::Enum(parse_enum_type_definition(
            parser,
            description,
        )?)),
        Token::Keyword(Keyword::Input) => Ok(Definition::InputObject(
            parse_input_object_type_definition(parser, description)?,
        )),
        Token::Keyword(Keyword::Extend) => Ok(Definition::Extension(
            parse_type_extension_definition(parser, description)?,
        )),
        Token::EndOfFile => Err(Spanning::new(
            parser.peek().span,
            ParseError::UnexpectedEndOfFile,
        )),
        _ => Err(parser.next_token()?.map(|found| {
            ParseError::expected_token(
                [
                    "{",
                    "query",
                    "mutation",
                    "fragment",
                    "type",
                    "interface",
                    "union",
                    "scalar",
                    "enum",
                    "input",
                    "extend",
                ],
                found,
            )
        })),
    }
}

fn parse_operation_definition(parser: &mut Parser<'_>) -> ParseResult<Operation> {
    if parser.peek().item == Token::CurlyOpen {
        let selection_set = parse_selection_set(parser)?;

        Ok(Spanning::new(
            selection_set.span,
            Operation {
                operation_type: OperationType::Query,
                name: None,
                variable_definitions: None,
                directives: None,
                selection_set: selection_set.item,
            },
        ))
    } else {
        let start_pos = parser.peek().span.start;
        let operation_type = parse_operation_type(parser)?;
        let name = match parser.peek().item.as_name() {
            Some(_) => Some(parser.expect_name()?.map(ArcStr::from)),
            None => None,
        };
        let variable_definitions = parse_variable_definitions(parser)?;
        let directives = parse_directives(parser)?;
        let selection_set = parse_selection_set(parser)?;

        Ok(Spanning::start_end(
            &start_pos,
            &selection_set.span.end,
            Operation {
                operation_type: operation_type.item,
                name,
                variable_definitions,
                directives: directives.map(|s| s.item),
                selection_set: selection_set.item,
            },
        ))
    }
}

fn parse_fragment_definition(parser: &mut Parser<'_>) -> ParseResult<Fragment> {
    let start_pos = parser.expect(&Token::Keyword(Keyword::Fragment))?.span.start;
    let name = parser.expect_name()?;
    if name.item == "on" {
        return Err(name.map(|_| ParseError::FragmentNamedOn));
    }

    parser.expect(&Token::Keyword(Keyword::On))?;
    let type_cond = parser.expect_name()?;

    let directives = parse_directives(parser)?;
    let selection_set = parse_selection_set(parser)?;

    Ok(Spanning::start_end(
        &start_pos,
        &selection_set.span.end,
        Fragment {
            name: name.map(ArcStr::from),
            type_condition: type_cond.map(ArcStr::from),
            directives: directives.map(|s| s.item),
            selection_set: selection_set.item,
        },
    ))
}

fn parse_optional_selection_set(parser: &mut Parser<'_>) -> OptionParseResult<Vec<Selection>> {
    if parser.peek().item == Token::CurlyOpen {
        Ok(Some(parse_selection_set(parser)?))
    } else {
        Ok(None)
    }
}

fn parse_selection_set(parser: &mut Parser<'_>) -> ParseResult<Vec<Selection>> {
    parser.unlocated_delimited_nonempty_list(
        &Token::CurlyOpen,
        parse_selection,
        &Token::CurlyClose,
    )
}

fn parse_selection(parser: &mut Parser<'_>) -> UnlocatedParseResult<Selection> {
    match parser.peek().item {
        Token::Ellipsis => parse_fragment(parser),
        _ => parse_field(parser).map(Selection::Field),
    }
}

fn parse_fragment(parser: &mut Parser<'_>) -> UnlocatedParseResult<Selection> {
    let start_pos = parser.expect(&Token::Ellipsis)?.span.start;

    match parser.peek().item {
        Token::Keyword(Keyword::On) => {
            parser.next_token()?;
            let name = parser.expect_name()?;

            let directives = parse_directives(parser)?;
            let selection_set = parse_selection_set(parser)?;

            Ok(Selection::InlineFragment(Spanning::start_end(
                &start_pos,
                &selection_set.span.end,
                InlineFragment {
                    type_condition: Some(name.map(ArcStr::from)),
                    directives: directives.map(|s| s.item),
                    selection_set: selection_set.item,
                },
            )))
        }
        Token::CurlyOpen | Token::At => {
            let directives = parse_directives(parser)?;
            let selection_set = parse_selection_set(parser)?;

            Ok(Selection::InlineFragment(Spanning::start_end(
                &start_pos,
                &selection_set.span.end,
                InlineFragment {
                    type_condition: None,
                    directives: directives.map(|s| s.item),
                    selection_set: selection_set.item,
                },
            )))
        }
        token if token.as_name().is_some() => {
            let frag_name = parser.expect_name()?;
            let directives = parse_directives(parser)?;

            Ok(Selection::FragmentSpread(Spanning::start_end(
                &start_pos,
                &directives
                    .as_ref()
                    .map_or(frag_name.span.end, |s| s.span.end),
                FragmentSpread {
                    name: frag_name.map(ArcStr::from),
                    directives: directives.map(|s| s.item),
                },
            )))
        }
        Token::EndOfFile => Err(Spanning::new(
            parser.peek().span,
            ParseError::UnexpectedEndOfFile,
        )),
        _ => Err(parser
            .next_token()?
            .map(|found| ParseError::expected_token(["Name", "on", "{", "@"], found))),
    }
}

fn parse_field(parser: &mut Parser<'_>) -> ParseResult<Field> {
    let first = parser.expect_name()?;

    let (alias, name) = if parser.skip(&Token::Colon)?.is_some() {
        (Some(first), parser.expect_name()?)
    } else {
        (None, first)
    };

    let arguments = parse_arguments(parser)?;
    let directives = parse_directives(parser)?;
    let selection_set = parse_optional_selection_set(parser)?;

    Ok(Spanning::start_end(
        &alias.as_ref().unwrap_or(&name).span.start,
        &selection_set
            .as_ref()
            .map(|s| s.span.end)
            .or_else(|| directives.as_ref().map(|s| s.span.end))
            .or_else(|| arguments.as_ref().map(|s| s.span.end))
            .unwrap_or(name.span.end),
        Field {
            alias: alias.map(|s| s.map(ArcStr::from)),
            name: name.map(ArcStr::from),
            arguments,
            directives: directives.map(|s| s.item),
            selection_set: selection_set.map(|s| s.item),
        },
    ))
}

fn parse_arguments(parser: &mut Parser<'_>) -> OptionParseResult<Arguments> {
    if parser.peek().item != Token::ParenOpen {
        return Ok(None);
    }

    let args = parser.delimited_nonempty_list(
        &Token::ParenOpen,
        parse_argument,
        &Token::ParenClose,
    )?;

    let mut items = IndexMap::with_capacity(args.item.len());
    for arg in args.item {
        let arg = arg.item;
        if items.contains_key(&arg.name.item) {
            return Err(duplicate(&arg.name, "argument"));
        }
        items.insert(arg.name.item.clone(), arg);
    }

    Ok(Some(Spanning::new(args.span, items)))
}

fn parse_argument(parser: &mut Parser<'_>) -> ParseResult<Argument> {
    let name = parser.expect_name()?;
    parser.expect(&Token::Colon)?;
    let value = parse_value_literal(parser, false)?;
    let end = value.span.end;

    Ok(Spanning::start_end(
        &name.span.start,
        &end,
        Argument {
            name: name.map(ArcStr::from),
            value,
        },
    ))
}

fn parse_operation_type(parser: &mut Parser<'_>) -> ParseResult<OperationType> {
    match parser.peek().item {
        Token::Keyword(Keyword::Query) => Ok(parser.next_token()?.map(|_| OperationType::Query)),
        Token::Keyword(Keyword::Mutation) => {
            Ok(parser.next_token()?.map(|_| OperationType::Mutation))
        }
        _ => Err(parser
            .next_token()?
            .map(|found| ParseError::expected_token(["query", "mutation"], found))),
    }
}

fn parse_variable_definitions(parser: &mut Parser<'_>) -> OptionParseResult<VariableDefinitions> {
    if parser.peek().item != Token::ParenOpen {
        return Ok(None);
    }

    let defs = parser.delimited_nonempty_list(
        &Token::ParenOpen,
        parse_variable_definition,
        &Token::ParenClose,
    )?;

    let mut items = IndexMap::with_capacity(defs.item.len());
    for def in defs.item {
        let def = def.item;
        if items.contains_key(&def.name.item) {
            return Err(duplicate(&def.name, "variable"));
        }
        items.insert(def.name.item.clone(), def);
    }

    Ok(Some(Spanning::new(defs.span, items)))
}

fn parse_variable_definition(parser: &mut Parser<'_>) -> ParseResult<VariableDefinition> {
    let start_pos = parser.expect(&Token::Dollar)?.span.start;
    let var_name = parser.expect_name()?;
    parser.expect(&Token::Colon)?;
    let var_type = parse_type(parser)?;

    let default_value = if parser.skip(&Token::Equals)?.is_some() {
        Some(parse_value_literal(parser, true)?)
    } else {
        None
    };

    Ok(Spanning::start_end(
        &start_pos,
        &default_value
            .as_ref()
            .map_or(var_type.span.end, |s| s.span.end),
        VariableDefinition {
            name: Spanning::start_end(&start_pos, &var_name.span.end, var_name.item.into()),
            var_type,
            default_value,
        },
    ))
}

fn parse_directives(parser: &mut Parser<'_>) -> OptionParseResult<Vec<Spanning<Directive>>> {
    if parser.peek().item != Token::At {
        return Ok(None);
    }

    let start_pos = parser.peek().span.start;
    let mut items = Vec::new();
    while parser.peek().item == Token::At {
        items.push(parse_directive(parser)?);
    }
    let end_pos = items.last().map_or(start_pos, |d| d.span.end);

    Ok(Some(Spanning::start_end(&start_pos, &end_pos, items)))
}

fn parse_directive(parser: &mut Parser<'_>) -> ParseResult<Directive> {
    let start_pos = parser.expect(&Token::At)?.span.start;
    let name = parser.expect_name()?;

    let arguments = parse_arguments(parser)?;

    Ok(Spanning::start_end(
        &start_pos,
        &arguments.as_ref().map_or(name.span.end, |s| s.span.end),
        Directive {
            name: name.map(ArcStr::from),
            arguments,
        },
    ))
}

fn parse_type(parser: &mut Parser<'_>) -> ParseResult<Type> {
    let parsed_type = if let Some(Spanning {
        span: ref start_span,
        ..
    }) = parser.skip(&Token::BracketOpen)?
    {
        let inner_type = parse_type(parser)?;
        let end_pos = parser.expect(&Token::BracketClose)?.span.end;
        Spanning::start_end(
            &start_span.start,
            &end_pos,
            Type::List(Box::new(inner_type.item)),
        )
    } else {
        parser.expect_name()?.map(|s| Type::Named(s.into()))
    };

    Ok(match parser.peek().item {
        Token::ExclamationMark => {
            let end_pos = parser.expect(&Token::ExclamationMark)?.span.end;
            Spanning::start_end(
                &parsed_type.span.start,
                &end_pos,
                Type::NonNull(Box::new(parsed_type.item)),
            )
        }
        _ => parsed_type,
    })
}

fn parse_object_type_definition(
    parser: &mut Parser<'_>,
    description: Option<String>,
) -> ParseResult<ObjectTypeDefinition> {
    let start_pos = parser.expect(&Token::Keyword(Keyword::Type))?.span.start;
    let name = parser.expect_name()?;

    let mut interfaces = Vec::new();
    if parser.skip(&Token::Keyword(Keyword::Implements))?.is_some() {
        loop {
            interfaces.push(parser.expect_name()?.map(ArcStr::from));
            if parser.peek().item == Token::CurlyOpen {
                break;
            }
        }
    }

    let fields = parse_field_definitions(parser)?;

    Ok(Spanning::start_end(
        &start_pos,
        &fields.span.end,
        ObjectTypeDefinition {
            name: name.map(ArcStr::from),
            description,
            interfaces,
            fields: fields.item,
        },
    ))
}

fn parse_field_definitions(parser: &mut Parser<'_>) -> ParseResult<FieldDefinitions> {
    let fields = parser.delimited_nonempty_list(
        &Token::CurlyOpen,
        parse_field_definition,
        &Token::CurlyClose,
    )?;

    let mut items = IndexMap::with_capacity(fields.item.len());
    for field in fields.item {
        if items.contains_key(&field.item.name.item) {
            return Err(duplicate(&field.item.name, "field"));
        }
        items.insert(field.item.name.item.clone(), field);
    }

    Ok(Spanning::new(fields.span, items))
}

fn parse_field_definition(parser: &mut Parser<'_>) -> ParseResult<FieldDefinition> {
    let description = parser.take_description();
    let name = parser.expect_name()?;

    let arguments = if parser.peek().item == Token::ParenOpen {
        parse_input_value_definitions(
            parser,
            &Token::ParenOpen,
            &Token::ParenClose,
            "argument",
        )?
        .item
    } else {
        IndexMap::new()
    };

    parser.expect(&Token::Colon)?;
    let field_type = parse_type(parser)?;
    let directives = parse_directives(parser)?;

    Ok(Spanning::start_end(
        &name.span.start,
        &directives
            .as_ref()
            .map_or(field_type.span.end, |s| s.span.end),
        FieldDefinition {
            name: name.map(ArcStr::from),
            description,
            arguments,
            field_type,
            deprecation: deprecation_status(directives.as_ref()),
        },
    ))
}

fn parse_input_value_definitions(
    parser: &mut Parser<'_>,
    opening: &Token,
    closing: &Token,
    kind: &'static str,
) -> ParseResult<InputValueDefinitions> {
    let values = parser.delimited_nonempty_list(opening, parse_input_value_definition, closing)?;

    let mut items = IndexMap::with_capacity(values.item.len());
    for value in values.item {
        if items.contains_key(&value.item.name.item) {
            return Err(duplicate(&value.item.name, kind));
        }
        items.insert(value.item.name.item.clone(), value);
    }

    Ok(Spanning::new(values.span, items))
}

fn parse_input_value_definition(parser: &mut Parser<'_>) -> ParseResult<InputValueDefinition> {
    let description = parser.take_description();
    let name = parser.expect_name()?;
    parser.expect(&Token::Colon)?;
    let value_type = parse_type(parser)?;

    let default_value = if parser.skip(&Token::Equals)?.is_some() {
        Some(parse_value_literal(parser, true)?)
    } else {
        None
    };
    let directives = parse_directives(parser)?;

    Ok(Spanning::start_end(
        &name.span.start,
        &directives
            .map(|s| s.span.end)
            .or_else(|| default_value.as_ref().map(|s| s.span.end))
            .unwrap_or(value_type.span.end),
        InputValueDefinition {
            name: name.map(ArcStr::from),
            description,
            value_type,
            default_value,
        },
    ))
}

fn parse_interface_type_definition(
    parser: &mut Parser<'_>,
    description: Option<String>,
) -> ParseResult<InterfaceTypeDefinition> {
    let start_pos = parser.expect(&Token::Keyword(Keyword::Interface))?.span.start;
    let name = parser.expect_name()?;
    let fields = parse_field_definitions(parser)?;

    Ok(Spanning::start_end(
        &start_pos,
        &fields.span.end,
        InterfaceTypeDefinition {
            name: name.map(ArcStr::from),
            description,
            fields: fields.item,
        },
    ))
}

fn parse_union_type_definition(
    parser: &mut Parser<'_>,
    description: Option<String>,
) -> ParseResult<UnionTypeDefinition> {
    let start_pos = parser.expect(&Token::Keyword(Keyword::Union))?.span.start;
    let name = parser.expect_name()?;
    parser.expect(&Token::Equals)?;
    parser.skip(&Token::Pipe)?;

    let mut members = vec![parser.expect_name()?.map(ArcStr::from)];
    while parser.skip(&Token::Pipe)?.is_some() {
        members.push(parser.expect_name()?.map(ArcStr::from));
    }

    let end_pos = members.last().map_or(name.span.end, |m| m.span.end);

    Ok(Spanning::start_end(
        &start_pos,
        &end_pos,
        UnionTypeDefinition {
            name: name.map(ArcStr::from),
            description,
            members,
        },
    ))
}

fn parse_scalar_type_definition(
    parser: &mut Parser<'_>,
    description: Option<String>,
) -> ParseResult<ScalarTypeDefinition> {
    let start_pos = parser.expect(&Token::Keyword(Keyword::Scalar))?.span.start;
    let name = parser.expect_name()?;

    Ok(Spanning::start_end(
        &start_pos,
        &name.span.end,
        ScalarTypeDefinition {
            name: name.map(ArcStr::from),
            description,
        },
    ))
}

fn parse_enum_type_definition(
    parser: &mut Parser<'_>,
    description: Option<String>,
) -> ParseResult<EnumTypeDefinition> {
    let start_pos = parser.expect(&Token::Keyword(Keyword::Enum))?.span.start;
    let name = parser.expect_name()?;

    let values = parser.delimited_nonempty_list(
        &Token::CurlyOpen,
        parse_enum_value_definition,
        &Token::CurlyClose,
    )?;

    let mut items = IndexMap::with_capacity(values.item.len());
    for value in values.item {
        if items.contains_key(&value.item.name.item) {
            return Err(duplicate(&value.item.name, "enum value"));
        }
        items.insert(value.item.name.item.clone(), value);
    }

    Ok(Spanning::start_end(
        &start_pos,
        &values.span.end,
        EnumTypeDefinition {
            name: name.map(ArcStr::from),
            description,
            values: items,
        },
    ))
}

fn parse_enum_value_definition(parser: &mut Parser<'_>) -> ParseResult<EnumValueDefinition> {
    let description = parser.take_description();

    if let Token::Boolean(_) | Token::Null = parser.peek().item {
        return Err(parser
            .next_token()?
            .map(|t| ParseError::InvalidEnumValue(t.to_string())));
    }

    let name = parser.expect_name()?;
    let directives = parse_directives(parser)?;

    Ok(Spanning::start_end(
        &name.span.start,
        &directives.as_ref().map_or(name.span.end, |s| s.span.end),
        EnumValueDefinition {
            name: name.map(ArcStr::from),
            description,
            deprecation: deprecation_status(directives.as_ref()),
        },
    ))
}

fn parse_input_object_type_definition(
    parser: &mut Parser<'_>,
    description: Option<String>,
) -> ParseResult<InputObjectTypeDefinition> {
    let start_pos = parser.expect(&Token::Keyword(Keyword::Input))?.span.start;
    let name = parser.expect_name()?;
    let fields = parse_input_value_definitions(
        parser,
        &Token::CurlyOpen,
        &Token::CurlyClose,
        "input field",
    )?;

    Ok(Spanning::start_end(
        &start_pos,
        &fields.span.end,
        InputObjectTypeDefinition {
            name: name.map(ArcStr::from),
            description,
            fields: fields.item,
        },
    ))
}

fn parse_type_extension_definition(
    parser: &mut Parser<'_>,
    description: Option<String>,
) -> ParseResult<TypeExtensionDefinition> {
    let start_pos = parser.expect(&Token::Keyword(Keyword::Extend))?.span.start;
    let definition = parse_object_type_definition(parser, description)?;

    Ok(Spanning::start_end(
        &start_pos,
        &definition.span.end,
        TypeExtensionDefinition {
            definition: definition.item,
        },
    ))
}

/// Reads `@deprecated` or `@deprecated(reason: "...")` out of `directives`.
fn deprecation_status(directives: Option<&Spanning<Vec<Spanning<Directive>>>>) -> DeprecationStatus {
    directives
        .and_then(|ds| ds.item.iter().find(|d| d.item.name.item == "deprecated"))
        .map_or(DeprecationStatus::Current, |d| {
            DeprecationStatus::Deprecated(
                d.item
                    .argument("reason")
                    .and_then(|r| r.item.as_string_value())
                    .map(ArcStr::from),
            )
        })
}

fn duplicate(name: &Spanning<ArcStr>, kind: &'static str) -> Spanning<ParseError> {
    Spanning::new(
        name.span,
        ParseError::DuplicateDefinition {
            kind,
            name: name.item.to_string(),
        },
    )
}

#[cfg(test)]
pub(crate) fn parse_value_source(s: &str) -> ParseResult<InputValue> {
    let mut lexer = Lexer::new(s);
    let mut parser = Parser::new(&mut lexer).map_err(|s| s.map(ParseError::LexerError))?;
    parse_value_literal(&mut parser, false)
}
